use crate::models::DeckId;

#[derive(Debug, thiserror::Error)]
pub enum DeckTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Deck {did} is nested deeper than the limit of {limit}")]
    TooDeep { did: DeckId, limit: usize },

    #[error("Deck id {0} appears more than once in the forest")]
    DuplicateId(DeckId),
}

pub type Result<T> = std::result::Result<T, DeckTreeError>;
