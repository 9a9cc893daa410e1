//! Semantic context retrieval
//!
//! Searches the conversation store for turns similar to the current
//! message and asks the catalog ranker for product suggestions built from
//! the combined context. This is a total boundary: every failure inside
//! the pipeline is folded into a fallback `RetrievalResult`, nothing
//! escapes as an error.

use souk_core::scoring::cosine_similarity;
use souk_core::topics::detect_topics;
use souk_core::{ConversationTurn, RetrievalResult, Role};
use souk_plugin_recommend::CatalogRanker;

use crate::store::ConversationStore;

/// Retriever configuration
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Minimum cosine similarity for a turn to count as relevant
    pub similarity_threshold: f32,
    /// Maximum similar turns returned per retrieval
    pub max_context_turns: usize,
    /// Retrieved turns blended into the product-ranking text
    pub max_turns_for_ranking: usize,
    /// Product suggestions requested per retrieval
    pub product_top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            max_context_turns: 5,
            max_turns_for_ranking: 3,
            product_top_k: 5,
        }
    }
}

/// Retrieves semantically similar context and product recommendations
pub struct ContextRetriever {
    store: ConversationStore,
    ranker: Option<CatalogRanker>,
    config: RetrieverConfig,
}

impl ContextRetriever {
    /// Create a retriever over a store and an optional catalog ranker.
    ///
    /// A missing ranker degrades retrieval to conversations only; a store
    /// without an embedder degrades the whole call to the fallback result.
    pub fn new(
        store: ConversationStore,
        ranker: Option<CatalogRanker>,
        config: RetrieverConfig,
    ) -> Self {
        Self {
            store,
            ranker,
            config,
        }
    }

    /// Append a turn to the underlying store
    pub async fn add_turn(
        &mut self,
        role: Role,
        content: impl Into<String>,
        session_id: impl Into<String>,
        timestamp: Option<String>,
    ) {
        self.store.add_turn(role, content, session_id, timestamp).await;
    }

    /// The underlying conversation store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Mutable access to the underlying store (batch loading)
    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    /// Whether a catalog ranker is attached
    pub fn ranker_available(&self) -> bool {
        self.ranker.is_some()
    }

    /// Retrieve similar prior turns and product suggestions.
    ///
    /// Never fails: a missing embedder, an embedding error, or any other
    /// internal failure yields `RetrievalResult::unavailable` with the
    /// cause attached. A successful search with zero matches is a success.
    pub async fn retrieve(
        &self,
        current_message: &str,
        current_session_id: &str,
        exclude_current_session: bool,
    ) -> RetrievalResult {
        let Some(embedder) = self.store.embedder() else {
            return RetrievalResult::unavailable("Embedding model not available");
        };

        let current_embedding = match embedder.embed(current_message).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::error!(error = %e, "Context retrieval failed");
                return RetrievalResult::unavailable(e.to_string());
            }
        };

        let mut similar: Vec<ConversationTurn> = Vec::new();
        for turn in self.store.iter() {
            let Some(embedding) = &turn.embedding else {
                continue;
            };
            if exclude_current_session && turn.session_id == current_session_id {
                continue;
            }
            let similarity = cosine_similarity(&current_embedding, embedding);
            if similarity >= self.config.similarity_threshold {
                similar.push(turn.scored_copy(similarity));
            }
        }

        // Stable sort: equal similarities keep insertion order.
        similar.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        similar.truncate(self.config.max_context_turns);

        let recommended_products = self.recommend_products(current_message, &similar).await;

        let context_summary = self.summarize(&similar, recommended_products.len());

        RetrievalResult {
            relevant_conversations: similar,
            recommended_products,
            context_summary,
            retrieval_success: true,
            error_message: None,
        }
    }

    /// Rank products against the current message plus the top retrieved
    /// turns. A ranking failure is logged and treated as "no products" —
    /// it never fails the retrieval.
    async fn recommend_products(
        &self,
        current_message: &str,
        similar: &[ConversationTurn],
    ) -> Vec<souk_core::RankedProduct> {
        let Some(ranker) = &self.ranker else {
            return Vec::new();
        };

        let mut context: Vec<&str> = vec![current_message];
        context.extend(
            similar
                .iter()
                .take(self.config.max_turns_for_ranking)
                .map(|t| t.content.as_str()),
        );
        let combined = context.join(" ");

        match ranker.rank(&combined, None, Some(self.config.product_top_k)).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Product recommendation failed");
                Vec::new()
            }
        }
    }

    fn summarize(&self, similar: &[ConversationTurn], product_count: usize) -> String {
        let mut parts = Vec::new();

        if !similar.is_empty() {
            parts.push(format!("Found {} similar conversations", similar.len()));

            let texts: Vec<&String> = similar.iter().take(3).map(|t| &t.content).collect();
            let topics = detect_topics(texts.into_iter());
            if !topics.is_empty() {
                parts.push(format!(
                    "Topics: {}",
                    topics.into_iter().collect::<Vec<_>>().join(", ")
                ));
            }
        }

        if product_count > 0 {
            parts.push(format!("Found {} relevant products", product_count));
        }

        if parts.is_empty() {
            "No relevant context found".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use souk_core::testing::{FailingEmbedder, HashEmbedder};
    use souk_core::{Embedder, Product};
    use souk_plugin_recommend::{Catalog, RankerConfig};

    use crate::store::StoreConfig;

    use super::*;

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new(128))
    }

    async fn retriever_with_threshold(threshold: f32) -> ContextRetriever {
        let store = ConversationStore::new(Some(embedder()), StoreConfig::default());
        ContextRetriever::new(
            store,
            None,
            RetrieverConfig {
                similarity_threshold: threshold,
                ..RetrieverConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_retrieves_identical_turn_from_other_session() {
        let mut retriever = retriever_with_threshold(0.7).await;
        retriever
            .add_turn(Role::User, "I need running shoes", "s1", None)
            .await;

        let result = retriever.retrieve("I need running shoes", "s2", true).await;
        assert!(result.retrieval_success);
        assert_eq!(result.relevant_conversations.len(), 1);
        let hit = &result.relevant_conversations[0];
        assert_eq!(hit.session_id, "s1");
        assert!(hit.similarity_score.unwrap() > 0.99);
    }

    #[tokio::test]
    async fn test_exclude_current_session() {
        let mut retriever = retriever_with_threshold(0.7).await;
        retriever
            .add_turn(Role::User, "I need running shoes", "s1", None)
            .await;
        retriever
            .add_turn(Role::Assistant, "We have several options", "s1", None)
            .await;

        // Textually identical to a stored turn, but it lives in the
        // excluded session.
        let result = retriever.retrieve("I need running shoes", "s1", true).await;
        assert!(result.retrieval_success);
        assert!(result.relevant_conversations.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_threshold_is_successful_empty() {
        let mut retriever = retriever_with_threshold(1.1).await;
        retriever
            .add_turn(Role::User, "I need running shoes", "s1", None)
            .await;

        let result = retriever.retrieve("I need running shoes", "s2", true).await;
        assert!(result.retrieval_success);
        assert!(result.relevant_conversations.is_empty());
        assert_eq!(result.context_summary, "No relevant context found");
    }

    #[tokio::test]
    async fn test_no_embedder_yields_fallback() {
        let store = ConversationStore::new(None, StoreConfig::default());
        let retriever = ContextRetriever::new(store, None, RetrieverConfig::default());

        let result = retriever.retrieve("anything", "s1", false).await;
        assert!(!result.retrieval_success);
        assert!(result.relevant_conversations.is_empty());
        assert!(result.recommended_products.is_empty());
        assert_eq!(
            result.context_summary,
            "Context retrieval temporarily unavailable"
        );
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_failing_embedder_yields_fallback() {
        let store = ConversationStore::new(Some(Arc::new(FailingEmbedder)), StoreConfig::default());
        let retriever = ContextRetriever::new(store, None, RetrieverConfig::default());

        let result = retriever.retrieve("anything", "s1", false).await;
        assert!(!result.retrieval_success);
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_turns_without_embedding_are_skipped() {
        // An embedding-less turn is stored but unsearchable, even when it
        // is textually identical to the query.
        let store = ConversationStore::new(Some(embedder()), StoreConfig::default());
        let mut retriever = ContextRetriever::new(store, None, RetrieverConfig::default());
        retriever.store_mut().push_raw(ConversationTurn::new(
            Role::User,
            "I need running shoes",
            "s1",
            "2024-01-01T00:00:00Z",
        ));

        let result = retriever.retrieve("I need running shoes", "s2", true).await;
        assert!(result.retrieval_success);
        assert!(result.relevant_conversations.is_empty());
    }

    #[tokio::test]
    async fn test_results_sorted_most_similar_first() {
        let mut retriever = retriever_with_threshold(0.1).await;
        retriever
            .add_turn(Role::User, "running shoes lightweight trainer", "s1", None)
            .await;
        retriever
            .add_turn(Role::User, "running shoes", "s2", None)
            .await;

        let result = retriever.retrieve("running shoes", "s9", true).await;
        assert!(result.relevant_conversations.len() >= 2);
        let scores: Vec<f32> = result
            .relevant_conversations
            .iter()
            .map(|t| t.similarity_score.unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(result.relevant_conversations[0].session_id, "s2");
    }

    #[tokio::test]
    async fn test_summary_includes_topics_and_products() {
        let catalog = Catalog::new(vec![Product {
            id: 1,
            title: "Argan Hair Oil".to_string(),
            description: "nourishing treatment".to_string(),
            category: "Haircare".to_string(),
            stock: 4,
            popularity: 0.8,
            recency: 0.6,
            personal: 0.3,
            seller_boost: 0.0,
        }]);
        let ranker = CatalogRanker::new(catalog, embedder(), RankerConfig::default())
            .await
            .unwrap();

        let store = ConversationStore::new(Some(embedder()), StoreConfig::default());
        let mut retriever = ContextRetriever::new(
            store,
            Some(ranker),
            RetrieverConfig {
                similarity_threshold: 0.5,
                ..RetrieverConfig::default()
            },
        );
        retriever
            .add_turn(Role::User, "something for my hair please", "s1", None)
            .await;

        let result = retriever
            .retrieve("something for my hair please", "s2", true)
            .await;
        assert!(result.retrieval_success);
        assert!(result.context_summary.contains("Found 1 similar conversations"));
        assert!(result.context_summary.contains("Topics: haircare"));
        assert!(result.context_summary.contains("relevant products"));
        assert!(!result.recommended_products.is_empty());
    }
}
