//! Conversation types

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    User,
    /// The assistant/model
    Assistant,
}

impl Role {
    /// Wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversation exchange held by the conversation store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: Role,

    /// The conversation content
    pub content: String,

    /// RFC 3339 timestamp
    pub timestamp: String,

    /// Session identifier
    pub session_id: String,

    /// Embedding vector (for semantic search); absent when the embedder
    /// failed for this turn, which leaves it stored but unsearchable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Similarity score, populated only on copies returned from retrieval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

impl ConversationTurn {
    /// Create a turn with no embedding or similarity score attached
    pub fn new(
        role: Role,
        content: impl Into<String>,
        session_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
            session_id: session_id.into(),
            embedding: None,
            similarity_score: None,
        }
    }

    /// Retrieval copy of this turn carrying its similarity score.
    ///
    /// The embedding is not carried over; retrieval copies are for
    /// external exposure, not for re-searching.
    pub fn scored_copy(&self, similarity: f32) -> Self {
        Self {
            role: self.role,
            content: self.content.clone(),
            timestamp: self.timestamp.clone(),
            session_id: self.session_id.clone(),
            embedding: None,
            similarity_score: Some(similarity),
        }
    }
}

/// A message record as stored in the external conversations file.
///
/// The conversations file maps session id to an ordered list of these;
/// it is read and written wholesale by the external collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Who spoke
    pub role: Role,

    /// Message content
    pub content: String,

    /// RFC 3339 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
