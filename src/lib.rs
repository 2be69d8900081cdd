//! Deck-tree visibility, due-count aggregation and search for deck lists.
//!
//! Takes the nested deck hierarchy of a flashcard collection and works out
//! which decks the deck list shows, the due totals for the header, how a live
//! search prunes the list, and which row a given deck lives on.
//!
//! # Quick start
//!
//! ```no_run
//! use deck_tree::{DeckForest, DeckSpec, DeckTree, InMemoryCollection};
//!
//! let forest = DeckForest::new(vec![
//!     DeckSpec::new(1, "Default"),
//!     DeckSpec::new(2, "French")
//!         .with_counts(5, 1, 20)
//!         .with_child(DeckSpec::new(3, "French::Verbs").with_counts(2, 0, 8)),
//! ])
//! .unwrap();
//! let collection = InMemoryCollection::from_forest(&forest);
//!
//! let mut tree = DeckTree::builder().build();
//! let outcome = tree.build_tree(&forest, &collection);
//! assert!(outcome.has_subdecks);
//!
//! let due = tree.total_due();
//! let rows = tree.filter("verbs");
//! let row = tree.find_position(3, &collection);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod aggregate;
pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod locale;
pub mod models;
pub mod position;
pub mod visibility;

pub use aggregate::{CountAggregator, DueTotals};
#[cfg(feature = "async")]
pub use async_client::AsyncDeckTree;
pub use collection::{DeckCollection, EtaScheduler, InMemoryCollection};
pub use error::{DeckTreeError, Result};
pub use filter::{FilterOutcome, FilterRequest};
pub use locale::CaseLocale;
pub use models::{DeckCounts, DeckForest, DeckId, DeckMetadata, DeckSpec, DeckTreeNode};

use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// Shared, immutable list of deck rows.
pub type DeckRows = Arc<[Arc<DeckTreeNode>]>;

/// Callback invoked with the new rows whenever a deck list is published.
pub type PublishListener = Box<dyn Fn(&DeckRows) + Send>;

// ---------------------------------------------------------------------------
// DeckTreeBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DeckTree`].
///
/// Use [`DeckTree::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DeckTreeBuilder::build).
pub struct DeckTreeBuilder {
    locale: Option<CaseLocale>,
    max_depth: usize,
    discard_superseded: bool,
}

impl Default for DeckTreeBuilder {
    fn default() -> Self {
        Self {
            locale: None,
            max_depth: config::DEFAULT_MAX_DEPTH,
            discard_superseded: true,
        }
    }
}

impl DeckTreeBuilder {
    /// Locale used to fold search patterns and deck names.
    ///
    /// If not set, the process locale from the environment is used (see
    /// [`config::default_locale`]).
    pub fn locale(mut self, locale: CaseLocale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Upper bound on ancestor hops followed when resolving a position.
    ///
    /// Defaults to [`config::DEFAULT_MAX_DEPTH`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Drop search results that were overtaken by a newer search or a
    /// rebuild before they could be published.
    ///
    /// Defaults to `true`. With `false`, every completed search is
    /// published in completion order.
    pub fn discard_superseded(mut self, discard: bool) -> Self {
        self.discard_superseded = discard;
        self
    }

    pub fn build(self) -> DeckTree {
        DeckTree {
            locale: self.locale.unwrap_or_else(config::default_locale),
            max_depth: self.max_depth,
            discard_superseded: self.discard_superseded,
            snapshot: Arc::from(Vec::new()),
            current: Arc::from(Vec::new()),
            has_subdecks: false,
            totals: CountAggregator::new(),
            generation: 0,
            active_pattern: String::new(),
            listeners: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildOutcome
// ---------------------------------------------------------------------------

/// Rows and subdeck flag produced by [`DeckTree::build_tree`].
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub visible: DeckRows,
    pub has_subdecks: bool,
}

// ---------------------------------------------------------------------------
// DeckTree
// ---------------------------------------------------------------------------

/// Derived state of the deck list between refreshes.
///
/// Holds the rows from the last [`build_tree`](Self::build_tree) (the
/// snapshot searches run over), the currently published rows, and the due
/// totals. Rebuilding replaces all of it; nodes are never mutated.
///
/// Mutating methods take `&mut self`, so rebuilds and publishes are
/// serialized by the borrow checker. Searches can still run elsewhere via
/// [`begin_filter`](Self::begin_filter) and [`publish`](Self::publish).
pub struct DeckTree {
    locale: CaseLocale,
    max_depth: usize,
    discard_superseded: bool,
    snapshot: DeckRows,
    current: DeckRows,
    has_subdecks: bool,
    totals: CountAggregator,
    generation: u64,
    active_pattern: String,
    listeners: Vec<PublishListener>,
}

impl Default for DeckTree {
    fn default() -> Self {
        DeckTreeBuilder::default().build()
    }
}

impl DeckTree {
    /// Create a new builder for configuring a deck tree.
    pub fn builder() -> DeckTreeBuilder {
        DeckTreeBuilder::default()
    }

    // -- Rebuild -----------------------------------------------------------

    /// Recompute visible rows, the subdeck flag and due totals from a fresh
    /// forest, and publish the unfiltered rows.
    ///
    /// Any search still in flight is superseded. The active search pattern is
    /// cleared; callers re-apply it with [`filter`](Self::filter).
    pub fn build_tree<C>(&mut self, forest: &DeckForest, collection: &C) -> BuildOutcome
    where
        C: DeckCollection + ?Sized,
    {
        self.totals.begin();
        let resolved = visibility::resolve(forest, collection, &mut self.totals);
        let rows: DeckRows = resolved.visible.into();

        self.generation += 1;
        self.snapshot = Arc::clone(&rows);
        self.has_subdecks = resolved.has_subdecks;
        self.active_pattern.clear();
        self.set_current(Arc::clone(&rows));

        BuildOutcome {
            visible: rows,
            has_subdecks: self.has_subdecks,
        }
    }

    // -- Search ------------------------------------------------------------

    /// Search synchronously and publish the result.
    ///
    /// An empty (or all-whitespace) pattern republishes the unfiltered rows.
    pub fn filter(&mut self, pattern: &str) -> DeckRows {
        let request = self.begin_filter(pattern);
        let outcome = request.run();
        self.publish(outcome);
        Arc::clone(&self.current)
    }

    /// Start a search over the current snapshot.
    ///
    /// The request owns everything it needs and can be [`run`](FilterRequest::run)
    /// on another thread. Any older request is superseded.
    pub fn begin_filter(&mut self, pattern: &str) -> FilterRequest {
        self.generation += 1;
        FilterRequest::new(
            self.generation,
            pattern,
            Arc::clone(&self.snapshot),
            self.locale,
        )
    }

    /// Swap in a finished search and notify listeners.
    ///
    /// Returns `false` if the outcome was superseded and discarded.
    pub fn publish(&mut self, outcome: FilterOutcome) -> bool {
        if self.discard_superseded && outcome.generation != self.generation {
            event!(
                Level::DEBUG,
                stale = outcome.generation,
                latest = self.generation,
                "Discarding superseded search result"
            );
            return false;
        }
        self.active_pattern = outcome.pattern;
        self.set_current(outcome.visible);
        true
    }

    fn set_current(&mut self, rows: DeckRows) {
        self.current = rows;
        for listener in &self.listeners {
            listener(&self.current);
        }
    }

    /// Register a callback run after every publish, while the new rows are
    /// being installed.
    pub fn on_publish<F>(&mut self, listener: F)
    where
        F: Fn(&DeckRows) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // -- Lookup ------------------------------------------------------------

    /// Row of `did` in the published rows, falling back to its nearest
    /// listed ancestor and finally to row 0.
    pub fn find_position<C>(&self, did: DeckId, collection: &C) -> usize
    where
        C: DeckCollection + ?Sized,
    {
        position::find_position(&self.current, did, collection, self.max_depth)
    }

    // -- Totals ------------------------------------------------------------

    pub fn total_counts(&self) -> DueTotals {
        self.totals.totals()
    }

    /// Sum of new, learning and review counts, or `None` before the first
    /// build.
    pub fn total_due(&self) -> Option<u32> {
        self.totals.total_due()
    }

    /// Estimated minutes to finish the due cards, or `None` before the first
    /// build.
    pub fn eta<S: EtaScheduler + ?Sized>(&self, scheduler: &S) -> Option<u32> {
        self.totals.eta(scheduler)
    }

    // -- Accessors ---------------------------------------------------------

    /// Currently published rows.
    pub fn visible(&self) -> DeckRows {
        Arc::clone(&self.current)
    }

    /// Unfiltered rows from the last build.
    pub fn snapshot(&self) -> DeckRows {
        Arc::clone(&self.snapshot)
    }

    pub fn has_subdecks(&self) -> bool {
        self.has_subdecks
    }

    /// Normalized pattern of the published search; empty when unfiltered.
    pub fn active_pattern(&self) -> &str {
        &self.active_pattern
    }

    pub fn is_filtered(&self) -> bool {
        !self.active_pattern.is_empty()
    }

    pub fn locale(&self) -> CaseLocale {
        self.locale
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for DeckTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeckTree(rows={}/{}, has_subdecks={}, pattern={:?}, due={})",
            self.current.len(),
            self.snapshot.len(),
            self.has_subdecks,
            self.active_pattern,
            match self.total_due() {
                Some(due) => due.to_string(),
                None => "n/a".to_string(),
            }
        )
    }
}
