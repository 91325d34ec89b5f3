//! Application state for the Q&A server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::QaConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::providers::{ChatCompletionsClient, LlmProvider};
use crate::storage::DocumentDb;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: QaConfig,
    /// Corpus, store and answer generator
    knowledge: KnowledgeBase,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Open the store, connect the LLM client and load the corpus
    pub async fn new(config: QaConfig) -> Result<Self> {
        tracing::info!("Initializing Q&A application state...");

        let db = Arc::new(DocumentDb::new(&config.storage.database_path)?);
        tracing::info!(
            "Document store opened at {}",
            config.storage.database_path.display()
        );

        let llm: Arc<dyn LlmProvider> = Arc::new(ChatCompletionsClient::new(&config.llm)?);
        if config.llm.api_key.is_none() {
            tracing::warn!("GROQ_API_KEY is not set; questions will fail until it is configured");
        }
        tracing::info!("LLM client initialized (model: {})", config.llm.model);

        Self::with_parts(config, db, llm).await
    }

    /// Build state from an already opened store and provider
    pub async fn with_parts(
        config: QaConfig,
        db: Arc<DocumentDb>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let knowledge = KnowledgeBase::open(&config, db, llm).await?;

        let (provider, model) = knowledge.llm_info();
        tracing::info!("Answer generator: {} ({})", provider, model);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                knowledge,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &QaConfig {
        &self.inner.config
    }

    /// Get the knowledge base
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.inner.knowledge
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
