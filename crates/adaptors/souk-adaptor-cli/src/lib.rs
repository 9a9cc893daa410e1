//! Bridge between an external chat system and the Souk context engine.
//!
//! One invocation handles one request: the caller passes a session id and
//! the current message, and receives a single JSON object on stdout with
//! the literal session history, the enhancement payload, and the augmented
//! system prompt. The schema is emitted on every path, including failures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde::{Deserialize, Serialize};
use souk_core::{config, Embedder, StoredMessage};
use souk_plugin_memory::{
    ContextOrchestrator, ContextRetriever, ConversationStore, EnhancementData,
    OrchestratorConfig, RetrieverConfig, StoreConfig,
};
use souk_plugin_recommend::{Catalog, CatalogRanker, RankerConfig};
use souk_provider_openai::{
    OpenAiEmbedder, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
};

/// Enhanced context bridge for the chat frontend
#[derive(Debug, Parser)]
#[command(name = "souk-context", version, about)]
pub struct BridgeArgs {
    /// Session id for the conversation
    pub session_id: String,

    /// Current user message
    pub message: String,

    /// Language code (ar, fr, en)
    #[arg(long, default_value = "ar")]
    pub language: String,

    /// Path to the conversations file
    #[arg(long, default_value = "data/conversations.json")]
    pub conversations_path: PathBuf,

    /// Path to the product catalog
    #[arg(long, default_value = "data/products.json")]
    pub catalog_path: PathBuf,

    /// Base system prompt the context sections are appended to
    #[arg(long, default_value = "")]
    pub base_prompt: String,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Disable semantic retrieval and fall back to literal history only
    #[arg(long)]
    pub disable_retrieval: bool,
}

/// The single JSON object emitted per invocation
#[derive(Debug, Serialize, Deserialize)]
pub struct BridgeResponse {
    /// Whether the enhanced path ran
    pub success: bool,
    /// Literal recent history of the session
    pub traditional_context: Vec<StoredMessage>,
    /// Semantic enhancement payload
    pub enhancement_data: EnhancementData,
    /// Augmented system prompt (empty on fallback)
    pub system_prompt: String,
    /// Number of literal history messages
    pub context_length: usize,
    /// Whether the retrieval subsystem is wired up
    pub ann_available: bool,
    /// Whether retrieval ran to completion
    pub retrieval_success: bool,
    /// Whether this response came from the degraded path
    pub fallback: bool,
    /// Error description on the degraded path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    /// Degraded response: literal history only, same schema
    pub fn fallback(traditional_context: Vec<StoredMessage>, error: impl Into<String>) -> Self {
        let context_length = traditional_context.len();
        Self {
            success: false,
            traditional_context,
            enhancement_data: EnhancementData::unavailable(),
            system_prompt: String::new(),
            context_length,
            ann_available: false,
            retrieval_success: false,
            fallback: true,
            error: Some(error.into()),
        }
    }
}

/// Last few messages of a session, read straight from the conversations
/// file. Used on the fallback path where no orchestrator exists.
pub fn load_traditional_context(
    conversations_path: &Path,
    session_id: &str,
    window: usize,
) -> Vec<StoredMessage> {
    let raw = match fs::read_to_string(conversations_path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    let conversations: BTreeMap<String, Vec<StoredMessage>> = match serde_json::from_str(&raw) {
        Ok(conversations) => conversations,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable conversations file");
            return Vec::new();
        }
    };
    let mut history = conversations.get(session_id).cloned().unwrap_or_default();
    if history.len() > window {
        history = history.split_off(history.len() - window);
    }
    history
}

fn build_embedder() -> Option<Arc<dyn Embedder>> {
    match config::get_required_env("OPENAI_API_KEY") {
        Ok(_) => {
            let model = config::get_env_or("SOUK_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);
            let dimension =
                config::get_env_usize("SOUK_EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION);
            Some(Arc::new(OpenAiEmbedder::with_model(model, dimension)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Running without semantic retrieval");
            None
        }
    }
}

async fn build_ranker(
    catalog_path: &Path,
    embedder: &Option<Arc<dyn Embedder>>,
) -> Option<CatalogRanker> {
    let embedder = embedder.as_ref()?;
    let catalog = match Catalog::load(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog unavailable; product recommendations disabled");
            return None;
        }
    };
    let config = RankerConfig {
        catalog_path: catalog_path.to_path_buf(),
        ..RankerConfig::default()
    };
    match CatalogRanker::new(catalog, embedder.clone(), config).await {
        Ok(ranker) => Some(ranker),
        Err(e) => {
            tracing::warn!(error = %e, "Catalog embedding failed; product recommendations disabled");
            None
        }
    }
}

/// Handle one bridge request end to end.
///
/// Always returns a response in the wire schema; the degraded path is a
/// value, not an error.
pub async fn handle(args: &BridgeArgs) -> BridgeResponse {
    let window = config::get_env_usize("SOUK_TRADITIONAL_CONTEXT", 6);

    if args.disable_retrieval {
        let traditional =
            load_traditional_context(&args.conversations_path, &args.session_id, window);
        return BridgeResponse::fallback(traditional, "Semantic retrieval disabled");
    }

    let embedder = build_embedder();
    let ranker = build_ranker(&args.catalog_path, &embedder).await;

    let store = ConversationStore::new(
        embedder,
        StoreConfig {
            capacity: config::get_env_usize("SOUK_STORE_CAPACITY", 1000),
        },
    );
    let retriever = ContextRetriever::new(
        store,
        ranker,
        RetrieverConfig {
            similarity_threshold: config::get_env_float("SOUK_SIMILARITY_THRESHOLD", 0.7),
            ..RetrieverConfig::default()
        },
    );
    tracing::info!(
        embedder = retriever.store().embedder_available(),
        recommender = retriever.ranker_available(),
        "Context components assembled"
    );
    let orchestrator = ContextOrchestrator::initialize(
        retriever,
        OrchestratorConfig {
            max_traditional_context: window,
            conversations_path: args.conversations_path.clone(),
            ..OrchestratorConfig::default()
        },
    )
    .await;

    let (traditional, enhancement) = orchestrator
        .enhanced_context(&args.message, &args.session_id)
        .await;
    let system_prompt = orchestrator.render_prompt(&args.base_prompt, &enhancement, &[]);

    BridgeResponse {
        success: true,
        context_length: traditional.len(),
        traditional_context: traditional,
        system_prompt,
        ann_available: enhancement.ann_available,
        retrieval_success: enhancement.retrieval_success,
        enhancement_data: enhancement,
        fallback: false,
        error: None,
    }
}
