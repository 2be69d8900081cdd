//! Flattening of the deck forest into the rows shown in the deck list.
//!
//! The walk is depth-first pre-order over an explicit stack of sibling
//! iterators, so deep hierarchies cannot exhaust the call stack.
//!
//! Two rules decide whether a node is emitted:
//!
//! - The default deck is hidden when it is empty, has no subdecks and has
//!   siblings.
//! - When one of a node's ancestors is collapsed, the node is hidden *and the
//!   rest of its sibling level is abandoned*. Siblings that follow a hidden
//!   node are never looked at, even if their own ancestors are expanded.

use std::sync::Arc;
use tracing::{event, Level};

use crate::aggregate::CountAggregator;
use crate::collection::DeckCollection;
use crate::config::DEFAULT_DECK_ID;
use crate::models::{DeckForest, DeckTreeNode};

/// Result of one visibility pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    /// Visible rows in display order.
    pub visible: Vec<Arc<DeckTreeNode>>,
    /// Whether any visited deck is nested under another.
    pub has_subdecks: bool,
}

struct SiblingLevel<'a> {
    siblings: std::slice::Iter<'a, Arc<DeckTreeNode>>,
    len: usize,
}

impl<'a> SiblingLevel<'a> {
    fn new(nodes: &'a [Arc<DeckTreeNode>]) -> Self {
        Self {
            siblings: nodes.iter(),
            len: nodes.len(),
        }
    }
}

/// Walk `forest` and collect the visible rows, feeding top-level counts into
/// `totals`.
///
/// `totals` should have been started with [`CountAggregator::begin`]; nodes
/// are added in the order they become visible.
pub fn resolve<C>(forest: &DeckForest, collection: &C, totals: &mut CountAggregator) -> Visibility
where
    C: DeckCollection + ?Sized,
{
    let mut out = Visibility::default();
    let mut stack = vec![SiblingLevel::new(forest.roots())];

    while let Some(level) = stack.last_mut() {
        let Some(node) = level.siblings.next() else {
            stack.pop();
            continue;
        };
        let siblings = level.len;

        if node.id() == DEFAULT_DECK_ID
            && siblings > 1
            && !node.has_children()
            && !collection.default_deck_has_cards()
        {
            event!(Level::TRACE, did = node.id(), "Hiding empty default deck");
            continue;
        }

        if hidden_by_collapsed_ancestor(node, collection, &mut out.has_subdecks) {
            event!(
                Level::TRACE,
                did = node.id(),
                "Collapsed ancestor; abandoning remaining siblings"
            );
            stack.pop();
            continue;
        }

        out.visible.push(Arc::clone(node));
        totals.add(node);
        stack.push(SiblingLevel::new(node.children()));
    }

    event!(
        Level::DEBUG,
        visible = out.visible.len(),
        has_subdecks = out.has_subdecks,
        "Resolved deck list"
    );
    out
}

/// Checks the node's ancestors root-first. Any ancestor at all marks the
/// forest as having subdecks, even when the node then turns out hidden.
fn hidden_by_collapsed_ancestor<C>(
    node: &DeckTreeNode,
    collection: &C,
    has_subdecks: &mut bool,
) -> bool
where
    C: DeckCollection + ?Sized,
{
    let Some(meta) = collection.metadata(node.id()) else {
        event!(
            Level::DEBUG,
            did = node.id(),
            "No metadata for deck; treating as top-level and expanded"
        );
        return false;
    };
    for parent in meta.parent_chain {
        *has_subdecks = true;
        if collection.is_collapsed(parent) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::InMemoryCollection;
    use crate::models::{DeckId, DeckMetadata, DeckSpec};

    fn ids(v: &Visibility) -> Vec<i64> {
        v.visible.iter().map(|n| n.id()).collect()
    }

    #[test]
    fn emits_pre_order() {
        let forest = DeckForest::new(vec![
            DeckSpec::new(2, "A")
                .with_child(DeckSpec::new(3, "A::B").with_child(DeckSpec::new(4, "A::B::C")))
                .with_child(DeckSpec::new(5, "A::D")),
            DeckSpec::new(6, "E"),
        ])
        .unwrap();
        let col = InMemoryCollection::from_forest(&forest);
        let v = resolve(&forest, &col, &mut CountAggregator::new());
        assert_eq!(ids(&v), vec![2, 3, 4, 5, 6]);
        assert!(v.has_subdecks);
    }

    #[test]
    fn missing_metadata_shows_node() {
        let forest = DeckForest::new(vec![
            DeckSpec::new(2, "A").with_child(DeckSpec::new(3, "A::B")),
        ])
        .unwrap();
        let col = InMemoryCollection::new();
        let v = resolve(&forest, &col, &mut CountAggregator::new());
        assert_eq!(ids(&v), vec![2, 3]);
        assert!(!v.has_subdecks);
    }

    #[test]
    fn missing_ancestor_metadata_is_not_collapsed() {
        let forest = DeckForest::new(vec![
            DeckSpec::new(2, "A").with_child(DeckSpec::new(3, "A::B")),
        ])
        .unwrap();
        let mut col = InMemoryCollection::new();
        col.insert(
            3,
            DeckMetadata {
                parent_chain: vec![2],
                ..Default::default()
            },
        );
        let v = resolve(&forest, &col, &mut CountAggregator::new());
        assert_eq!(ids(&v), vec![2, 3]);
        assert!(v.has_subdecks);
    }

    /// Answers collapse queries without producing ancestor metadata.
    struct CollapsedOnly {
        inner: InMemoryCollection,
        collapsed: DeckId,
    }

    impl DeckCollection for CollapsedOnly {
        fn metadata(&self, did: DeckId) -> Option<DeckMetadata> {
            (did != self.collapsed).then(|| self.inner.metadata(did)).flatten()
        }

        fn is_collapsed(&self, did: DeckId) -> bool {
            did == self.collapsed
        }
    }

    #[test]
    fn ancestors_are_checked_through_is_collapsed() {
        let forest = DeckForest::new(vec![
            DeckSpec::new(2, "A").with_child(DeckSpec::new(3, "A::B")),
            DeckSpec::new(4, "C"),
        ])
        .unwrap();
        let col = CollapsedOnly {
            inner: InMemoryCollection::from_forest(&forest),
            collapsed: 2,
        };
        let v = resolve(&forest, &col, &mut CountAggregator::new());
        assert_eq!(ids(&v), vec![2, 4]);
        assert!(v.has_subdecks);
    }
}
