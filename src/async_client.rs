//! Async wrapper around [`DeckTree`] for use in async runtimes (Tokio, etc.).
//!
//! Searches run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`] over an immutable snapshot, so the lock on
//! the tree is only held to start a search and to publish its result. Each
//! publish is sent on a [`watch`] channel, from inside the publish itself,
//! for consumers that redraw the deck list.
//!
//! # Example
//!
//! ```no_run
//! use deck_tree::{AsyncDeckTree, DeckForest, DeckSpec, DeckTree, InMemoryCollection};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let forest = DeckForest::new(vec![DeckSpec::new(2, "French")]).unwrap();
//!     let collection = InMemoryCollection::from_forest(&forest);
//!
//!     let tree = AsyncDeckTree::new(DeckTree::builder().build());
//!     let mut rows = tree.subscribe();
//!     tree.build_tree(forest, collection).await.unwrap();
//!
//!     tree.filter("fre").await.unwrap();
//!     rows.changed().await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::aggregate::DueTotals;
use crate::collection::DeckCollection;
use crate::error::{DeckTreeError, Result};
use crate::models::{DeckForest, DeckId};
use crate::{BuildOutcome, DeckRows, DeckTree};

/// Async wrapper around [`DeckTree`].
///
/// The tree is protected by a [`Mutex`]; searches are dispatched to the
/// blocking pool and published under the lock, so readers never see a
/// partially updated list. When several searches overlap, the most recently
/// started one wins unless the tree was built with
/// [`discard_superseded(false)`](crate::DeckTreeBuilder::discard_superseded).
pub struct AsyncDeckTree {
    inner: Arc<Mutex<DeckTree>>,
    rows: Arc<watch::Sender<DeckRows>>,
}

impl AsyncDeckTree {
    pub fn new(mut tree: DeckTree) -> Self {
        let (rows, _) = watch::channel(tree.visible());
        let rows = Arc::new(rows);
        let sender = Arc::clone(&rows);
        tree.on_publish(move |published| {
            sender.send_replace(Arc::clone(published));
        });
        Self {
            inner: Arc::new(Mutex::new(tree)),
            rows,
        }
    }

    fn lock(inner: &Mutex<DeckTree>) -> Result<MutexGuard<'_, DeckTree>> {
        inner
            .lock()
            .map_err(|_| DeckTreeError::InvalidArgument("Deck tree lock poisoned".into()))
    }

    /// Receiver that observes every published deck list.
    pub fn subscribe(&self) -> watch::Receiver<DeckRows> {
        self.rows.subscribe()
    }

    /// Run a sync operation on the tree on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DeckTree) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tree = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = Self::lock(&tree)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| DeckTreeError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Rebuild from a fresh forest on the blocking pool and publish the
    /// unfiltered rows.
    pub async fn build_tree<C>(&self, forest: DeckForest, collection: C) -> Result<BuildOutcome>
    where
        C: DeckCollection + Send + 'static,
    {
        self.run(move |tree| Ok(tree.build_tree(&forest, &collection)))
            .await
    }

    /// Search the current snapshot off the async thread and publish the
    /// result.
    ///
    /// Returns the published rows, or `None` if a newer search or rebuild
    /// superseded this one before it finished.
    pub async fn filter(&self, pattern: &str) -> Result<Option<DeckRows>> {
        let request = Self::lock(&self.inner)?.begin_filter(pattern);
        let outcome = tokio::task::spawn_blocking(move || request.run())
            .await
            .map_err(|e| DeckTreeError::InvalidArgument(format!("Task join error: {e}")))?;

        let mut guard = Self::lock(&self.inner)?;
        Ok(guard.publish(outcome).then(|| guard.visible()))
    }

    /// Row of `did` in the published rows.
    pub fn find_position<C>(&self, did: DeckId, collection: &C) -> Result<usize>
    where
        C: DeckCollection + ?Sized,
    {
        Ok(Self::lock(&self.inner)?.find_position(did, collection))
    }

    pub fn total_counts(&self) -> Result<DueTotals> {
        Ok(Self::lock(&self.inner)?.total_counts())
    }

    /// Currently published rows.
    pub fn visible(&self) -> Result<DeckRows> {
        Ok(Self::lock(&self.inner)?.visible())
    }
}

impl From<DeckTree> for AsyncDeckTree {
    fn from(tree: DeckTree) -> Self {
        Self::new(tree)
    }
}
