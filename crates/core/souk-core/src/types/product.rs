//! Product catalog types

use serde::{Deserialize, Serialize};

/// A catalog product with its business ranking signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable product id
    pub id: u64,

    /// Product title
    pub title: String,

    /// Product description
    pub description: String,

    /// Product category
    pub category: String,

    /// Units in stock; out-of-stock products are never ranked
    pub stock: u32,

    /// Popularity signal, normalized to [0, 1] before scoring
    pub popularity: f32,

    /// Recency signal, normalized to [0, 1] before scoring
    pub recency: f32,

    /// Personalization signal, normalized to [0, 1] before scoring
    pub personal: f32,

    /// Seller-controlled multiplicative boost, clamped to [0, 0.25] at
    /// scoring time
    #[serde(default)]
    pub seller_boost: f32,
}

impl Product {
    /// Text the product embedding is derived from
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// A ranked product view returned from the catalog ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    /// Product id
    pub id: u64,

    /// Product title
    pub title: String,

    /// Product category
    pub category: String,

    /// Ranking score, rounded to two decimals
    pub score: f32,

    /// Human-readable reason this product was suggested
    pub reason: String,
}
