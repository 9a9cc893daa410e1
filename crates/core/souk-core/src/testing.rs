//! Test doubles for the embedder seam
//!
//! Shipping these in core lets every downstream crate test retrieval and
//! ranking against a deterministic embedding without network access.

use async_trait::async_trait;

use crate::{Embedder, Result, SoukError};

/// Deterministic bag-of-words embedder.
///
/// Each whitespace token is hashed (FNV-1a) into a bucket of the output
/// vector and the result L2-normalized. Identical input always produces
/// the identical vector; texts sharing tokens have positive cosine
/// similarity, disjoint texts are near-orthogonal. Useful for exercising
/// thresholds and idempotence without a real model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder with the given output dimensionality
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn fnv1a(token: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.to_lowercase().split_whitespace() {
            let bucket = (Self::fnv1a(token) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(128)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Embedder that fails on every call, for exercising fallback paths
#[derive(Debug, Clone, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(SoukError::embedder("embedding model unavailable"))
    }

    fn dimension(&self) -> usize {
        0
    }
}
