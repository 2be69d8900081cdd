use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::{DeckCounts, DeckId};
use crate::config::{DECK_NAME_SEPARATOR, DEFAULT_DECK_ID, DEFAULT_MAX_DEPTH};
use crate::error::{DeckTreeError, Result};

// ---------------------------------------------------------------------------
// DeckSpec — Serializable input shape for one deck and its subdecks
// ---------------------------------------------------------------------------

/// Plain description of a deck as handed over by the collection.
///
/// Depths are not part of the input; they are derived from nesting when the
/// specs are turned into a [`DeckForest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSpec {
    pub id: DeckId,
    /// Full `::`-separated deck name.
    pub name: String,
    /// Present only when the deck's counts should be displayed.
    #[serde(default)]
    pub counts: Option<DeckCounts>,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default)]
    pub children: Vec<DeckSpec>,
}

impl DeckSpec {
    pub fn new(id: DeckId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_counts(mut self, new: u32, lrn: u32, rev: u32) -> Self {
        self.counts = Some(DeckCounts::new(new, lrn, rev));
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.is_dynamic = true;
        self
    }

    pub fn with_child(mut self, child: DeckSpec) -> Self {
        self.children.push(child);
        self
    }
}

// ---------------------------------------------------------------------------
// DeckTreeNode — Immutable node of the deck forest
// ---------------------------------------------------------------------------

/// One deck in a built forest.
///
/// Nodes are never mutated after construction. Children are shared through
/// [`Arc`], so a filtered copy of a parent can reference the original child
/// nodes without cloning whole subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTreeNode {
    id: DeckId,
    name: String,
    depth: usize,
    counts: Option<DeckCounts>,
    is_dynamic: bool,
    children: Vec<Arc<DeckTreeNode>>,
}

impl DeckTreeNode {
    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Full hierarchical name, e.g. `"Languages::French::Verbs"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trailing component of the name, e.g. `"Verbs"`.
    pub fn last_name_component(&self) -> &str {
        self.name
            .rsplit(DECK_NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    pub fn name_components(&self) -> impl Iterator<Item = &str> {
        self.name.split(DECK_NAME_SEPARATOR)
    }

    /// 0 for top-level decks, parent depth + 1 otherwise.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn counts(&self) -> Option<&DeckCounts> {
        self.counts.as_ref()
    }

    pub fn should_display_counts(&self) -> bool {
        self.counts.is_some()
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    pub fn children(&self) -> &[Arc<DeckTreeNode>] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Copy of this node with `children` in place of its own.
    ///
    /// The children are expected to be a subset of this node's descendants
    /// at depth + 1, so depths stay consistent.
    pub fn with_children(&self, children: Vec<Arc<DeckTreeNode>>) -> DeckTreeNode {
        DeckTreeNode {
            id: self.id,
            name: self.name.clone(),
            depth: self.depth,
            counts: self.counts,
            is_dynamic: self.is_dynamic,
            children,
        }
    }

    fn from_spec(
        spec: DeckSpec,
        depth: usize,
        max_depth: usize,
        seen: &mut HashSet<DeckId>,
    ) -> Result<DeckTreeNode> {
        if depth > max_depth {
            return Err(DeckTreeError::TooDeep {
                did: spec.id,
                limit: max_depth,
            });
        }
        if !seen.insert(spec.id) {
            return Err(DeckTreeError::DuplicateId(spec.id));
        }
        let children = spec
            .children
            .into_iter()
            .map(|child| Self::from_spec(child, depth + 1, max_depth, seen).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(DeckTreeNode {
            id: spec.id,
            name: spec.name,
            depth,
            counts: spec.counts,
            is_dynamic: spec.is_dynamic,
            children,
        })
    }
}

// ---------------------------------------------------------------------------
// DeckForest — Ordered, validated top-level decks
// ---------------------------------------------------------------------------

/// Snapshot of the whole deck hierarchy for one refresh.
///
/// Ids are unique across the forest and no deck is nested deeper than the
/// limit it was built with. Cloning is cheap; clones share nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckForest {
    roots: Vec<Arc<DeckTreeNode>>,
}

impl DeckForest {
    /// Build a forest with the default nesting limit.
    pub fn new(specs: Vec<DeckSpec>) -> Result<Self> {
        Self::with_max_depth(specs, DEFAULT_MAX_DEPTH)
    }

    /// Build a forest, rejecting duplicate ids and decks nested deeper than
    /// `max_depth`.
    pub fn with_max_depth(specs: Vec<DeckSpec>, max_depth: usize) -> Result<Self> {
        let mut seen = HashSet::new();
        let roots = specs
            .into_iter()
            .map(|spec| DeckTreeNode::from_spec(spec, 0, max_depth, &mut seen).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { roots })
    }

    /// Parse a JSON array of [`DeckSpec`] objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<DeckSpec> = serde_json::from_str(json)?;
        Self::new(specs)
    }

    /// Read and parse a JSON file holding an array of [`DeckSpec`] objects.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn roots(&self) -> &[Arc<DeckTreeNode>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every node in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<DeckTreeNode>> {
        let mut stack: Vec<&Arc<DeckTreeNode>> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, did: DeckId) -> Option<&Arc<DeckTreeNode>> {
        self.iter().find(|node| node.id == did)
    }

    /// True when the only top-level deck is the default deck.
    pub fn only_has_default_deck(&self) -> bool {
        matches!(self.roots.as_slice(), [only] if only.id == DEFAULT_DECK_ID)
    }

    /// Sum of the counts of every top-level deck that displays counts,
    /// ignoring visibility.
    pub fn total_counts(&self) -> DeckCounts {
        self.roots
            .iter()
            .filter_map(|root| root.counts)
            .fold(DeckCounts::default(), |acc, c| acc + c)
    }
}
