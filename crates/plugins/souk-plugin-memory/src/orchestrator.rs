//! Context orchestration
//!
//! Merges the literal recent history of the current session with
//! semantically retrieved context from other sessions, and builds the
//! augmented system prompt. Constructed once at process start and passed
//! by reference to request handlers; there is no global instance.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use souk_core::{RankedProduct, RetrievalResult, Role, StoredMessage};

use crate::retriever::ContextRetriever;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Literal-history window for the current session
    pub max_traditional_context: usize,
    /// Conversations file maintained by the external collaborator
    pub conversations_path: PathBuf,
    /// Similar-conversation excerpts appended to the prompt
    pub max_prompt_conversations: usize,
    /// Additional product recommendations appended to the prompt
    pub max_prompt_products: usize,
    /// Excerpt truncation length, in characters
    pub excerpt_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_traditional_context: 6,
            conversations_path: PathBuf::from("data/conversations.json"),
            max_prompt_conversations: 3,
            max_prompt_products: 2,
            excerpt_chars: 100,
        }
    }
}

/// A similar conversation as exposed on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarConversation {
    /// Turn content
    pub content: String,
    /// Who spoke
    pub role: Role,
    /// Session the turn came from
    pub session_id: String,
    /// Cosine similarity to the current message
    pub similarity: Option<f32>,
    /// Turn timestamp
    pub timestamp: String,
}

/// Structured enhancement payload merged into the bridge response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementData {
    /// Similar prior turns with similarity scores
    pub similar_conversations: Vec<SimilarConversation>,
    /// Ranked product suggestions
    pub recommended_products: Vec<RankedProduct>,
    /// Human-readable retrieval summary
    pub context_summary: String,
    /// Whether the semantic retrieval subsystem is wired up
    pub ann_available: bool,
    /// Whether the last retrieval ran to completion
    pub retrieval_success: bool,
}

impl EnhancementData {
    /// Payload for a disabled or unavailable retrieval subsystem
    pub fn unavailable() -> Self {
        Self {
            similar_conversations: Vec::new(),
            recommended_products: Vec::new(),
            context_summary: String::new(),
            ann_available: false,
            retrieval_success: false,
        }
    }
}

/// Merges literal session history with semantic retrieval output
pub struct ContextOrchestrator {
    retriever: ContextRetriever,
    config: OrchestratorConfig,
}

impl ContextOrchestrator {
    /// Construct the orchestrator and seed the conversation store from
    /// the conversations file.
    ///
    /// A missing or unreadable conversations file is logged and treated
    /// as empty; malformed records inside it are skipped per-record.
    pub async fn initialize(mut retriever: ContextRetriever, config: OrchestratorConfig) -> Self {
        let conversations = Self::read_conversations(&config.conversations_path);
        if !conversations.is_empty() {
            retriever.store_mut().load_existing(&conversations).await;
        }
        Self { retriever, config }
    }

    fn read_conversations(path: &PathBuf) -> BTreeMap<String, Vec<StoredMessage>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No conversations file");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(conversations) => conversations,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable conversations file");
                BTreeMap::new()
            }
        }
    }

    /// Literal recent history plus the enhancement payload.
    ///
    /// The literal window is re-read from the conversations file on every
    /// call since the external collaborator owns that file.
    pub async fn enhanced_context(
        &self,
        current_message: &str,
        session_id: &str,
    ) -> (Vec<StoredMessage>, EnhancementData) {
        let conversations = Self::read_conversations(&self.config.conversations_path);
        let mut traditional = conversations.get(session_id).cloned().unwrap_or_default();
        if traditional.len() > self.config.max_traditional_context {
            traditional = traditional
                .split_off(traditional.len() - self.config.max_traditional_context);
        }

        let ann_available = self.ann_available();
        if !ann_available {
            return (traditional, EnhancementData::unavailable());
        }

        // Retrieval searches other sessions; the current session is
        // already covered by the literal window.
        let result = self.retriever.retrieve(current_message, session_id, true).await;
        tracing::info!(
            conversations = result.relevant_conversations.len(),
            products = result.recommended_products.len(),
            success = result.retrieval_success,
            "Context retrieved"
        );

        (traditional, Self::enhancement_from(result, ann_available))
    }

    fn enhancement_from(result: RetrievalResult, ann_available: bool) -> EnhancementData {
        EnhancementData {
            similar_conversations: result
                .relevant_conversations
                .into_iter()
                .map(|turn| SimilarConversation {
                    content: turn.content,
                    role: turn.role,
                    session_id: turn.session_id,
                    similarity: turn.similarity_score,
                    timestamp: turn.timestamp,
                })
                .collect(),
            recommended_products: result.recommended_products,
            context_summary: result.context_summary,
            ann_available,
            retrieval_success: result.retrieval_success,
        }
    }

    /// Build the augmented system prompt.
    ///
    /// Appends up to three similar-conversation excerpts and up to two
    /// product recommendations not already present in the caller's
    /// current set, then a fixed instructional note whose wording depends
    /// on whether retrieval succeeded, came back empty, or is unavailable.
    pub async fn build_system_prompt(
        &self,
        base_prompt: &str,
        current_message: &str,
        session_id: &str,
        current_recommendations: &[RankedProduct],
    ) -> String {
        let (_, enhancement) = self.enhanced_context(current_message, session_id).await;
        self.render_prompt(base_prompt, &enhancement, current_recommendations)
    }

    /// Render the prompt from an already-computed enhancement payload
    pub fn render_prompt(
        &self,
        base_prompt: &str,
        enhancement: &EnhancementData,
        current_recommendations: &[RankedProduct],
    ) -> String {
        let mut parts = vec![base_prompt.to_string()];

        if !enhancement.similar_conversations.is_empty() {
            parts.push("\nRELEVANT PREVIOUS CONVERSATIONS:".to_string());
            for conv in enhancement
                .similar_conversations
                .iter()
                .take(self.config.max_prompt_conversations)
            {
                let excerpt: String = conv.content.chars().take(self.config.excerpt_chars).collect();
                parts.push(format!(
                    "- {}: {}... (similarity: {:.2})",
                    role_title(conv.role),
                    excerpt,
                    conv.similarity.unwrap_or(0.0)
                ));
            }
        }

        let current_ids: Vec<u64> = current_recommendations.iter().map(|p| p.id).collect();
        let additional: Vec<&RankedProduct> = enhancement
            .recommended_products
            .iter()
            .filter(|p| !current_ids.contains(&p.id))
            .take(self.config.max_prompt_products)
            .collect();
        if !additional.is_empty() {
            parts.push(
                "\nADDITIONAL SEMANTIC RECOMMENDATIONS (based on conversation history):"
                    .to_string(),
            );
            for product in additional {
                parts.push(format!(
                    "- {} (score: {:.2}, reason: {})",
                    product.title, product.score, product.reason
                ));
            }
        }

        if enhancement.ann_available && enhancement.retrieval_success {
            parts.push(
                "\nCONTEXT MEMORY: Use the above similar conversations to maintain \
                 consistency and remember user preferences across sessions. \
                 Reference relevant past discussions naturally."
                    .to_string(),
            );
        } else if enhancement.ann_available && !enhancement.retrieval_success {
            parts.push(
                "\nNOTE: Context memory is temporarily limited. \
                 Focus on the current conversation."
                    .to_string(),
            );
        }

        parts.join("\n")
    }

    /// Forward a new turn to the conversation store.
    ///
    /// The conversations file itself is written by the external
    /// collaborator, never from here.
    pub async fn add_message(
        &mut self,
        session_id: &str,
        role: Role,
        content: &str,
        timestamp: Option<String>,
    ) {
        self.retriever
            .add_turn(role, content, session_id, timestamp)
            .await;
    }

    /// Whether semantic retrieval is wired up (an embedder is attached)
    pub fn ann_available(&self) -> bool {
        self.retriever.store().embedder_available()
    }

    /// The underlying retriever
    pub fn retriever(&self) -> &ContextRetriever {
        &self.retriever
    }
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    }
}
