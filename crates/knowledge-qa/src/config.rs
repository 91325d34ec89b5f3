//! Configuration for the Q&A service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// TF-IDF vectorizer configuration
    pub vectorizer: VectorizerConfig,
    /// Ranking and context configuration
    pub retrieval: RetrievalConfig,
    /// Upstream LLM configuration
    pub llm: LlmConfig,
    /// Document store configuration
    pub storage: StorageConfig,
}

impl QaConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str::<QaConfig>(&raw)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            None => QaConfig::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `GROQ_API_KEY`, `QA_DATABASE_PATH`, `QA_HOST` and `QA_PORT`
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(path) = std::env::var("QA_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(host) = std::env::var("QA_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("QA_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid QA_PORT value: {}", port),
            }
        }
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.vectorizer.max_features == 0 {
            return Err(Error::Config("vectorizer.max_features must be positive".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be positive".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

/// Word-window chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Words per chunk
    pub chunk_size: usize,
    /// Words shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// TF-IDF vectorizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Upper bound on vocabulary size (most frequent terms are kept)
    pub max_features: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_features: 1000 }
    }
}

/// Ranking and context assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks forwarded to the LLM
    pub top_k: usize,
    /// Characters of chunk text shown per source
    pub excerpt_chars: usize,
    /// Optional cap on the rendered context (disabled by default)
    pub max_context_chars: Option<usize>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            excerpt_chars: 200,
            max_context_chars: None,
        }
    }
}

/// Upstream chat-completions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completions endpoint
    pub api_url: String,
    /// Bearer credential; usually supplied through `GROQ_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Model used by the health probe
    pub health_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Health probe timeout in seconds
    pub health_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            health_model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.5,
            max_tokens: 500,
            timeout_secs: 30,
            health_timeout_secs: 10,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let database_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("knowledge-qa")
            .join("knowledge_qa.db");

        Self { database_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = QaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = QaConfig::default();
        config.chunking.chunk_overlap = 500;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: QaConfig = toml::from_str(
            r#"
            [chunking]
            chunk_size = 120

            [retrieval]
            top_k = 5
            max_context_chars = 4000
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 120);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.max_context_chars, Some(4000));
        assert_eq!(config.vectorizer.max_features, 1000);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.toml");
        std::fs::write(&path, "[vectorizer]\nmax_features = 64\n").unwrap();

        let config = QaConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.vectorizer.max_features, 64);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = 10\nchunk_overlap = 10\n").unwrap();

        assert!(QaConfig::load(Some(path.as_path())).is_err());
    }
}
