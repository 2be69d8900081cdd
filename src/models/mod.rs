pub mod counts;
pub mod metadata;
pub mod node;

pub use counts::*;
pub use metadata::*;
pub use node::*;

/// Deck identifier, unique across a collection.
pub type DeckId = i64;
