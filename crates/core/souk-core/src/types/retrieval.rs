//! Retrieval result types

use serde::{Deserialize, Serialize};

use super::{ConversationTurn, RankedProduct};

/// Summary text used whenever the retrieval path is unavailable
pub const UNAVAILABLE_SUMMARY: &str = "Context retrieval temporarily unavailable";

/// Retrieved context and recommendations for one request.
///
/// Retrieval never raises to its caller: failures are folded into this
/// structure with `retrieval_success = false` and an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Similar prior turns, most similar first, carrying similarity scores
    pub relevant_conversations: Vec<ConversationTurn>,

    /// Ranked product suggestions
    pub recommended_products: Vec<RankedProduct>,

    /// Human-readable summary of what was found
    pub context_summary: String,

    /// Whether the retrieval pipeline ran to completion
    pub retrieval_success: bool,

    /// Error description when the pipeline degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RetrievalResult {
    /// Fallback result for a degraded retrieval path.
    ///
    /// Empty lists, a fixed summary, and the caught error attached. This is
    /// distinct from a successful search with no matches, which keeps
    /// `retrieval_success = true`.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            relevant_conversations: Vec::new(),
            recommended_products: Vec::new(),
            context_summary: UNAVAILABLE_SUMMARY.to_string(),
            retrieval_success: false,
            error_message: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_result() {
        let result = RetrievalResult::unavailable("model missing");
        assert!(!result.retrieval_success);
        assert!(result.relevant_conversations.is_empty());
        assert!(result.recommended_products.is_empty());
        assert_eq!(result.context_summary, UNAVAILABLE_SUMMARY);
        assert_eq!(result.error_message.as_deref(), Some("model missing"));
    }
}
