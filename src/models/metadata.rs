use serde::{Deserialize, Serialize};

use super::DeckId;

// ---------------------------------------------------------------------------
// DeckMetadata — Per-deck state owned by the collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMetadata {
    /// Whether the deck's descendants are hidden from the deck list.
    #[serde(default)]
    pub collapsed: bool,
    /// Ancestor deck ids, root first. The last entry is the immediate parent.
    #[serde(default)]
    pub parent_chain: Vec<DeckId>,
    /// Whether any card lives directly in this deck. Only consulted for the
    /// default deck.
    #[serde(default)]
    pub has_cards: bool,
    /// Filtered ("dynamic") deck marker.
    #[serde(default)]
    pub is_dynamic: bool,
}

impl DeckMetadata {
    /// Id of the immediate parent, if the deck is nested.
    pub fn parent(&self) -> Option<DeckId> {
        self.parent_chain.last().copied()
    }
}
