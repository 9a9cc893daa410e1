//! Bounded conversation store
//!
//! An append-only ring of embedded conversation turns. Eviction is
//! strictly insertion order regardless of access pattern — this is a
//! FIFO bound, not an LRU.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use souk_core::{ConversationTurn, Embedder, Role, SoukError, StoredMessage};

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Hard capacity bound; the oldest turns are evicted past this
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Store statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Turns currently held
    pub total_turns: usize,
    /// Configured capacity
    pub capacity: usize,
    /// Whether an embedder is attached
    pub embedder_available: bool,
}

/// Bounded, append-only collection of timestamped conversation turns
pub struct ConversationStore {
    turns: VecDeque<ConversationTurn>,
    embedder: Option<Arc<dyn Embedder>>,
    config: StoreConfig,
}

impl ConversationStore {
    /// Create a store; `embedder` may be absent, in which case turns are
    /// stored without embeddings and are unsearchable
    pub fn new(embedder: Option<Arc<dyn Embedder>>, config: StoreConfig) -> Self {
        Self {
            turns: VecDeque::new(),
            embedder,
            config,
        }
    }

    /// Append a turn, embedding it when possible, then evict from the
    /// front until the store fits its capacity.
    ///
    /// An embedding failure is logged and the turn is stored without an
    /// embedding — unsearchable, but not lost.
    pub async fn add_turn(
        &mut self,
        role: Role,
        content: impl Into<String>,
        session_id: impl Into<String>,
        timestamp: Option<String>,
    ) {
        let timestamp = timestamp.unwrap_or_else(|| Utc::now().to_rfc3339());
        let mut turn = ConversationTurn::new(role, content, session_id, timestamp);

        if let Some(embedder) = &self.embedder {
            match embedder.embed(&turn.content).await {
                Ok(embedding) => turn.embedding = Some(embedding),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to embed turn; storing without embedding");
                }
            }
        }

        self.turns.push_back(turn);
        while self.turns.len() > self.config.capacity {
            self.turns.pop_front();
        }
    }

    /// Batch-load existing conversations keyed by session id.
    ///
    /// Sessions are seeded in key order so the FIFO eviction bound keeps
    /// the same turns on every run. Malformed records (empty content) are
    /// skipped per-record and logged; a bad record never aborts the batch.
    /// Returns the number of turns loaded.
    pub async fn load_existing(
        &mut self,
        conversations: &BTreeMap<String, Vec<StoredMessage>>,
    ) -> usize {
        let mut loaded = 0;
        for (session_id, messages) in conversations {
            for message in messages {
                if message.content.trim().is_empty() {
                    let err = SoukError::missing_field("content", "stored conversation turn");
                    tracing::warn!(session_id = %session_id, error = %err, "Skipping malformed record");
                    continue;
                }
                self.add_turn(
                    message.role,
                    message.content.clone(),
                    session_id.clone(),
                    message.timestamp.clone(),
                )
                .await;
                loaded += 1;
            }
        }
        tracing::info!(loaded, "Loaded existing conversation turns");
        loaded
    }

    /// Iterate stored turns, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Number of stored turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the store holds no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether an embedder is attached
    pub fn embedder_available(&self) -> bool {
        self.embedder.is_some()
    }

    /// The attached embedder, if any
    pub fn embedder(&self) -> Option<Arc<dyn Embedder>> {
        self.embedder.clone()
    }

    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
    }

    /// Statistics snapshot
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_turns: self.turns.len(),
            capacity: self.config.capacity,
            embedder_available: self.embedder.is_some(),
        }
    }
}
