//! Conversation memory plugin for Souk
//!
//! Provides the bounded conversation store, threshold-gated semantic
//! retrieval over it, and the orchestrator that merges literal session
//! history with retrieved context into an augmented prompt.

mod orchestrator;
mod retriever;
mod store;

pub use orchestrator::{
    ContextOrchestrator, EnhancementData, OrchestratorConfig, SimilarConversation,
};
pub use retriever::{ContextRetriever, RetrieverConfig};
pub use store::{ConversationStore, StoreConfig, StoreStats};
