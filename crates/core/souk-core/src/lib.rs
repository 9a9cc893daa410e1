//! Souk Core
//!
//! This crate provides the shared types, error taxonomy, and pure scoring
//! functions for the Souk context retrieval system. It includes:
//!
//! - The `Embedder` trait — the seam to the opaque text-to-vector model
//! - Conversation, product, and retrieval result types
//! - Cosine similarity and the weighted ranking score
//! - Topic tagging from multi-locale trigger substrings
//! - Environment-driven configuration helpers
//!
//! # Example: scoring a candidate
//!
//! ```
//! use souk_core::scoring::{compute_score, normalize};
//!
//! let sim = normalize(0.83);
//! let score = compute_score(sim, 0.5, 0.7, 1.0, 0.4, 0.2, 0.1);
//! assert!(score > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod embedder;
pub mod error;
pub mod scoring;
pub mod testing;
pub mod topics;
pub mod types;

pub use embedder::Embedder;
pub use error::{Result, SoukError};
pub use types::{
    ConversationTurn, Product, RankedProduct, RetrievalResult, Role, StoredMessage,
};
