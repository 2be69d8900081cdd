//! Live search over the deck list.
//!
//! A deck survives a search when its full name contains the pattern, in which
//! case its whole subtree is kept as-is, or when at least one descendant
//! survives, in which case it is kept with only the surviving children.
//! Survivors keep their original order.
//!
//! Filtering is split into a [`FilterRequest`], which owns an immutable
//! snapshot and can run on any thread, and a [`FilterOutcome`], which the
//! owner of the deck list publishes once the work is done.

use std::sync::Arc;
use tracing::{event, Level};

use crate::locale::CaseLocale;
use crate::models::DeckTreeNode;

/// Fold and trim a raw search string under `locale`.
pub fn normalize_pattern(raw: &str, locale: CaseLocale) -> String {
    locale.fold(raw).trim().to_string()
}

/// Whether `name` contains the already-normalized `pattern`.
///
/// The name is folded twice, under `locale` and under the root locale, and
/// either fold may match.
pub fn name_matches(name: &str, pattern: &str, locale: CaseLocale) -> bool {
    locale.fold(name).contains(pattern) || CaseLocale::Root.fold(name).contains(pattern)
}

/// Filter `nodes` against the normalized `pattern`.
///
/// An empty pattern keeps every node unchanged.
pub fn filter_nodes(
    pattern: &str,
    nodes: &[Arc<DeckTreeNode>],
    locale: CaseLocale,
) -> Vec<Arc<DeckTreeNode>> {
    if pattern.is_empty() {
        return nodes.to_vec();
    }
    nodes
        .iter()
        .filter_map(|node| filter_node(pattern, node, locale))
        .collect()
}

fn filter_node(
    pattern: &str,
    node: &Arc<DeckTreeNode>,
    locale: CaseLocale,
) -> Option<Arc<DeckTreeNode>> {
    if name_matches(node.name(), pattern, locale) {
        return Some(Arc::clone(node));
    }
    let children: Vec<_> = node
        .children()
        .iter()
        .filter_map(|child| filter_node(pattern, child, locale))
        .collect();
    if children.is_empty() {
        None
    } else {
        Some(Arc::new(node.with_children(children)))
    }
}

// ---------------------------------------------------------------------------
// FilterRequest / FilterOutcome
// ---------------------------------------------------------------------------

/// A pending search over a snapshot of the deck list.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    generation: u64,
    pattern: String,
    snapshot: Arc<[Arc<DeckTreeNode>]>,
    locale: CaseLocale,
}

impl FilterRequest {
    pub(crate) fn new(
        generation: u64,
        raw_pattern: &str,
        snapshot: Arc<[Arc<DeckTreeNode>]>,
        locale: CaseLocale,
    ) -> Self {
        Self {
            generation,
            pattern: normalize_pattern(raw_pattern, locale),
            snapshot,
            locale,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The folded, trimmed pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Run the search. Pure; safe to call off the owning thread.
    pub fn run(self) -> FilterOutcome {
        let visible: Arc<[Arc<DeckTreeNode>]> = if self.pattern.is_empty() {
            Arc::clone(&self.snapshot)
        } else {
            filter_nodes(&self.pattern, &self.snapshot, self.locale).into()
        };
        event!(
            Level::DEBUG,
            generation = self.generation,
            pattern = %self.pattern,
            matched = visible.len(),
            of = self.snapshot.len(),
            "Filtered deck list"
        );
        FilterOutcome {
            generation: self.generation,
            pattern: self.pattern,
            visible,
        }
    }
}

/// Completed search, ready to be published.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub(crate) generation: u64,
    pub(crate) pattern: String,
    pub(crate) visible: Arc<[Arc<DeckTreeNode>]>,
}

impl FilterOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn visible(&self) -> &[Arc<DeckTreeNode>] {
        &self.visible
    }
}
