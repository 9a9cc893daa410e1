//! OpenAI embeddings integration for Souk

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::{Arc, OnceLock};

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use souk_core::{Embedder, Result, SoukError};

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Output dimensionality of the default model
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// Shared OpenAI client instance for connection pooling
static CLIENT: OnceLock<Arc<Client<async_openai::config::OpenAIConfig>>> = OnceLock::new();

fn get_client() -> Arc<Client<async_openai::config::OpenAIConfig>> {
    CLIENT
        .get_or_init(|| {
            tracing::debug!("Initializing shared OpenAI client");
            Arc::new(Client::new())
        })
        .clone()
}

/// Embedder backed by the OpenAI embeddings API.
///
/// Construction never fails; API failures surface per-call as
/// `SoukError::EmbedderUnavailable` so callers can degrade.
pub struct OpenAiEmbedder {
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    /// Create an embedder for the default model
    pub fn new() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }

    /// Create an embedder for a specific model and output dimension
    pub fn with_model(model: impl Into<String>, dimension: usize) -> Self {
        Self {
            model: model.into(),
            dimension,
        }
    }
}

impl Default for OpenAiEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let client = get_client();

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(text)
            .build()
            .map_err(|e| SoukError::embedder(e.to_string()))?;

        let response = client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| SoukError::embedder(e.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| SoukError::embedder("No embedding returned"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let client = get_client();

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(texts.to_vec())
            .build()
            .map_err(|e| SoukError::embedder(e.to_string()))?;

        let response = client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| SoukError::embedder(e.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(SoukError::embedder(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        Ok(response.data.into_iter().map(|e| e.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let embedder = OpenAiEmbedder::new();
        assert_eq!(embedder.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(embedder.dimension(), DEFAULT_EMBEDDING_DIMENSION);
    }

    #[test]
    fn test_custom_model() {
        let embedder = OpenAiEmbedder::with_model("text-embedding-3-small", 1536);
        assert_eq!(embedder.model, "text-embedding-3-small");
        assert_eq!(embedder.dimension(), 1536);
    }
}
