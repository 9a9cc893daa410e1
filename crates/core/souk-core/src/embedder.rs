//! The embedder seam
//!
//! The embedding model is an opaque external text-to-vector function. It is
//! injected wherever embeddings are needed rather than discovered; absence
//! of an embedder is a first-class state that drives the fallback paths.

use async_trait::async_trait;

use crate::Result;

/// Text-to-vector model interface.
///
/// Implementations make no retry or determinism guarantees beyond
/// producing the same vector for identical input within one process.
/// Failures surface as `SoukError::EmbedderUnavailable` — callers decide
/// whether to degrade or propagate.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text into a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimensionality of this embedder
    fn dimension(&self) -> usize;

    /// Embed several texts. The default implementation embeds serially;
    /// implementations with a batch endpoint should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
