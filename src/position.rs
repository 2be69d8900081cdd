//! Mapping a deck id to its row in the visible deck list.

use std::sync::Arc;
use tracing::{event, Level};

use crate::collection::DeckCollection;
use crate::models::{DeckId, DeckTreeNode};

/// Row of `did` in `visible`.
///
/// A deck that is not listed (typically hidden under a collapsed ancestor)
/// resolves to the row of its nearest listed ancestor. Returns 0 when the
/// ancestor chain runs out, or when more than `max_hops` parents have been
/// followed.
pub fn find_position<C>(
    visible: &[Arc<DeckTreeNode>],
    did: DeckId,
    collection: &C,
    max_hops: usize,
) -> usize
where
    C: DeckCollection + ?Sized,
{
    let mut target = did;
    for _ in 0..=max_hops {
        if let Some(pos) = visible.iter().position(|node| node.id() == target) {
            return pos;
        }
        match collection.metadata(target).and_then(|meta| meta.parent()) {
            Some(parent) => target = parent,
            None => return 0,
        }
    }
    event!(
        Level::WARN,
        did,
        max_hops,
        "Ancestor chain too long or cyclic; falling back to first row"
    );
    0
}
