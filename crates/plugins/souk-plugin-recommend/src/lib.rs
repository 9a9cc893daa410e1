//! Product recommendation plugin for Souk
//!
//! Holds the product catalog with precomputed embeddings and ranks
//! candidates against a live session using a weighted blend of semantic
//! similarity and business signals.

mod catalog;
mod ranker;
mod reason;

pub use catalog::Catalog;
pub use ranker::{CatalogRanker, RankerConfig};
pub use reason::reason_for;
