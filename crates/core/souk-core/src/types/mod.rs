//! Shared data types for the Souk context system

mod conversation;
mod product;
mod retrieval;

pub use conversation::{ConversationTurn, Role, StoredMessage};
pub use product::{Product, RankedProduct};
pub use retrieval::RetrievalResult;
