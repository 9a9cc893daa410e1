//! Catalog ranking
//!
//! The ranker owns the catalog plus a parallel embedding array computed
//! from `title + " " + description` at build time. Embeddings are never
//! persisted; they are recomputed whenever the catalog is (re)loaded.

use std::path::PathBuf;
use std::sync::Arc;

use souk_core::scoring::{compute_score, cosine_similarity, normalize, round2};
use souk_core::{Embedder, Product, RankedProduct, Result};

use crate::catalog::Catalog;
use crate::reason::reason_for;

/// Ranker configuration
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Default number of candidates returned by `rank`
    pub top_k: usize,
    /// Where boost updates are persisted
    pub catalog_path: PathBuf,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            catalog_path: PathBuf::from("data/products.json"),
        }
    }
}

/// Ranks catalog products against a session description
pub struct CatalogRanker {
    catalog: Catalog,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
    config: RankerConfig,
}

impl CatalogRanker {
    /// Build a ranker, embedding every product up front.
    ///
    /// An embedding failure here propagates: a ranker without product
    /// embeddings cannot rank, and callers treat the absence of a ranker
    /// as the catalog-unavailable degraded mode.
    pub async fn new(
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
        config: RankerConfig,
    ) -> Result<Self> {
        let texts: Vec<String> = catalog
            .products()
            .iter()
            .map(Product::embedding_text)
            .collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        tracing::info!(products = catalog.len(), "Catalog embeddings computed");
        Ok(Self {
            catalog,
            embeddings,
            embedder,
            config,
        })
    }

    /// Rank in-stock products against the session text.
    ///
    /// When a category filter is supplied, only case-insensitive exact
    /// category matches survive and those score a full category match.
    /// Without a filter every surviving candidate gets the neutral 0.5
    /// category signal. That asymmetry is intentional and load-bearing
    /// for score comparability across calls.
    pub async fn rank(
        &self,
        session_text: &str,
        category: Option<&str>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedProduct>> {
        let session_embedding = self.embedder.embed(session_text).await?;
        let category_lower = category.map(|c| c.to_lowercase());

        let mut candidates = Vec::new();
        for (product, embedding) in self.catalog.products().iter().zip(&self.embeddings) {
            if product.stock == 0 {
                continue;
            }
            if let Some(ref wanted) = category_lower {
                if product.category.to_lowercase() != *wanted {
                    continue;
                }
            }

            let sim = normalize(cosine_similarity(&session_embedding, embedding));
            let cat_match = if category_lower.is_some() { 1.0 } else { 0.5 };
            let score = compute_score(
                sim,
                cat_match,
                normalize(product.popularity),
                normalize(product.stock as f32),
                normalize(product.recency),
                normalize(product.personal),
                product.seller_boost,
            );

            candidates.push(RankedProduct {
                id: product.id,
                title: product.title.clone(),
                category: product.category.clone(),
                score: round2(score),
                reason: reason_for(session_text, product),
            });
        }

        // Stable sort keeps catalog order for equal scores.
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k.unwrap_or(self.config.top_k));
        Ok(candidates)
    }

    /// Overwrite a product's seller boost and persist the full catalog.
    ///
    /// An unknown id leaves the catalog untouched (logged, not an error —
    /// this matches the external contract). Persistence failures are
    /// returned to the caller, never swallowed.
    pub fn update_seller_boost(&mut self, product_id: u64, boost: f32) -> Result<()> {
        match self.catalog.product_mut(product_id) {
            Some(product) => {
                product.seller_boost = boost;
                tracing::info!(product_id, boost, "Seller boost updated");
            }
            None => {
                tracing::warn!(product_id, "Seller boost update for unknown product id");
            }
        }
        self.catalog.save(&self.config.catalog_path)
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souk_core::testing::HashEmbedder;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: 1,
                title: "Running Shoes".to_string(),
                description: "lightweight trainer".to_string(),
                category: "Footwear".to_string(),
                stock: 5,
                popularity: 1.0,
                recency: 1.0,
                personal: 1.0,
                seller_boost: 0.0,
            },
            Product {
                id: 2,
                title: "Yoga Mat".to_string(),
                description: "non-slip surface".to_string(),
                category: "Fitness".to_string(),
                stock: 3,
                popularity: 0.4,
                recency: 0.2,
                personal: 0.1,
                seller_boost: 0.0,
            },
            Product {
                id: 3,
                title: "Trail Jacket".to_string(),
                description: "waterproof shell".to_string(),
                category: "Outerwear".to_string(),
                stock: 0,
                popularity: 0.9,
                recency: 0.9,
                personal: 0.9,
                seller_boost: 0.0,
            },
        ])
    }

    async fn ranker_with(config: RankerConfig) -> CatalogRanker {
        CatalogRanker::new(sample_catalog(), Arc::new(HashEmbedder::new(128)), config)
            .await
            .unwrap()
    }

    async fn ranker() -> CatalogRanker {
        ranker_with(RankerConfig::default()).await
    }

    #[tokio::test]
    async fn test_running_shoes_scenario() {
        let ranker = ranker().await;
        let ranked = ranker.rank("I need running shoes", None, None).await.unwrap();

        assert_eq!(ranked[0].id, 1);
        assert_eq!(ranked[0].reason, "Matches your request for running shoes.");
        assert!(ranked[0].score > 0.0);
    }

    #[tokio::test]
    async fn test_out_of_stock_excluded() {
        let ranker = ranker().await;
        let ranked = ranker.rank("waterproof trail jacket", None, None).await.unwrap();
        assert!(ranked.iter().all(|p| p.id != 3));
    }

    #[tokio::test]
    async fn test_category_filter_exact_case_insensitive() {
        let ranker = ranker().await;
        let ranked = ranker
            .rank("something for workouts", Some("fitness"), None)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 2);
    }

    #[tokio::test]
    async fn test_category_match_asymmetry() {
        // Filtered candidates get the full 1.0 category signal, so the
        // same product scores higher with a matching filter than without.
        let ranker = ranker().await;
        let unfiltered = ranker.rank("yoga gear", None, None).await.unwrap();
        let filtered = ranker.rank("yoga gear", Some("Fitness"), None).await.unwrap();

        let without = unfiltered.iter().find(|p| p.id == 2).unwrap();
        let with = filtered.iter().find(|p| p.id == 2).unwrap();
        assert!(with.score > without.score);
    }

    #[tokio::test]
    async fn test_rank_idempotent() {
        let ranker = ranker().await;
        let first = ranker.rank("I need running shoes", None, None).await.unwrap();
        let second = ranker.rank("I need running shoes", None, None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_top_k_truncation() {
        let ranker = ranker().await;
        let ranked = ranker.rank("anything", None, Some(1)).await.unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[tokio::test]
    async fn test_update_seller_boost_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let config = RankerConfig {
            top_k: 5,
            catalog_path: path.clone(),
        };
        let mut ranker = ranker_with(config).await;

        let before = ranker.rank("running shoes", None, None).await.unwrap();
        ranker.update_seller_boost(999, 0.2).unwrap();
        let after = ranker.rank("running shoes", None, None).await.unwrap();

        assert_eq!(before, after);
        // The catalog file was still rewritten.
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_update_seller_boost_raises_score() {
        let dir = tempfile::tempdir().unwrap();
        let config = RankerConfig {
            top_k: 5,
            catalog_path: dir.path().join("products.json"),
        };
        let mut ranker = ranker_with(config).await;

        let before = ranker.rank("running shoes", None, None).await.unwrap();
        let before_score = before.iter().find(|p| p.id == 1).unwrap().score;

        ranker.update_seller_boost(1, 0.25).unwrap();
        let after = ranker.rank("running shoes", None, None).await.unwrap();
        let after_score = after.iter().find(|p| p.id == 1).unwrap().score;

        assert!(after_score > before_score);
        assert!(after_score <= round2(before_score * 1.25) + 0.01);
    }

    #[tokio::test]
    async fn test_update_persists_boost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let config = RankerConfig {
            top_k: 5,
            catalog_path: path.clone(),
        };
        let mut ranker = ranker_with(config).await;
        ranker.update_seller_boost(2, 0.15).unwrap();

        let reloaded = Catalog::load(&path).unwrap();
        let yoga = reloaded.products().iter().find(|p| p.id == 2).unwrap();
        assert_eq!(yoga.seller_boost, 0.15);
    }
}
