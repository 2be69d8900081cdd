//! Collaborators consumed by the deck tree: the collection's per-deck state
//! and the scheduler's time estimate.
//!
//! [`InMemoryCollection`] is a snapshot implementation that can be loaded
//! from JSON or derived from the shape of a [`DeckForest`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::DEFAULT_DECK_ID;
use crate::error::Result;
use crate::models::{DeckCounts, DeckForest, DeckId, DeckMetadata, DeckTreeNode};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Read access to the per-deck state kept by the collection.
pub trait DeckCollection {
    /// Metadata for `did`, or `None` if the deck is unknown (for example,
    /// deleted since the forest was built).
    fn metadata(&self, did: DeckId) -> Option<DeckMetadata>;

    /// Whether `did` is collapsed in the deck list. Unknown decks are
    /// expanded.
    fn is_collapsed(&self, did: DeckId) -> bool {
        self.metadata(did).is_some_and(|meta| meta.collapsed)
    }

    /// Whether the default deck directly holds any cards.
    ///
    /// An unknown default deck counts as having cards, so it stays visible.
    fn default_deck_has_cards(&self) -> bool {
        self.metadata(DEFAULT_DECK_ID)
            .map_or(true, |meta| meta.has_cards)
    }
}

impl<C: DeckCollection + ?Sized> DeckCollection for &C {
    fn metadata(&self, did: DeckId) -> Option<DeckMetadata> {
        (**self).metadata(did)
    }

    fn is_collapsed(&self, did: DeckId) -> bool {
        (**self).is_collapsed(did)
    }

    fn default_deck_has_cards(&self) -> bool {
        (**self).default_deck_has_cards()
    }
}

/// Estimated minutes needed to work through a set of due counts.
pub trait EtaScheduler {
    fn eta(&self, counts: DeckCounts) -> u32;
}

impl<F> EtaScheduler for F
where
    F: Fn(DeckCounts) -> u32,
{
    fn eta(&self, counts: DeckCounts) -> u32 {
        self(counts)
    }
}

// ---------------------------------------------------------------------------
// InMemoryCollection
// ---------------------------------------------------------------------------

/// Deck metadata held in a map, keyed by deck id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryCollection {
    #[serde(default)]
    decks: HashMap<DeckId, DeckMetadata>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive ancestor chains and dynamic flags from the forest's nesting.
    ///
    /// Every deck starts expanded and the default deck starts without cards.
    pub fn from_forest(forest: &DeckForest) -> Self {
        let mut decks = HashMap::new();
        let mut stack: Vec<(&Arc<DeckTreeNode>, Vec<DeckId>)> = forest
            .roots()
            .iter()
            .rev()
            .map(|root| (root, Vec::new()))
            .collect();
        while let Some((node, chain)) = stack.pop() {
            for child in node.children().iter().rev() {
                let mut child_chain = chain.clone();
                child_chain.push(node.id());
                stack.push((child, child_chain));
            }
            decks.insert(
                node.id(),
                DeckMetadata {
                    parent_chain: chain,
                    is_dynamic: node.is_dynamic(),
                    ..Default::default()
                },
            );
        }
        Self { decks }
    }

    /// Parse a JSON object of the form `{"decks": {"<id>": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn insert(&mut self, did: DeckId, metadata: DeckMetadata) {
        self.decks.insert(did, metadata);
    }

    pub fn remove(&mut self, did: DeckId) -> Option<DeckMetadata> {
        self.decks.remove(&did)
    }

    /// Mark `did` collapsed or expanded. Unknown ids are ignored.
    pub fn with_collapsed(mut self, did: DeckId, collapsed: bool) -> Self {
        if let Some(meta) = self.decks.get_mut(&did) {
            meta.collapsed = collapsed;
        }
        self
    }

    /// Record whether `did` directly holds cards. Unknown ids are ignored.
    pub fn with_cards(mut self, did: DeckId, has_cards: bool) -> Self {
        if let Some(meta) = self.decks.get_mut(&did) {
            meta.has_cards = has_cards;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

impl DeckCollection for InMemoryCollection {
    fn metadata(&self, did: DeckId) -> Option<DeckMetadata> {
        self.decks.get(&did).cloned()
    }

    fn is_collapsed(&self, did: DeckId) -> bool {
        self.decks.get(&did).is_some_and(|meta| meta.collapsed)
    }

    fn default_deck_has_cards(&self) -> bool {
        self.decks
            .get(&DEFAULT_DECK_ID)
            .map_or(true, |meta| meta.has_cards)
    }
}
