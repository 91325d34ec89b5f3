//! Response types for the HTTP surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::query::RankedChunk;
use crate::providers::ComponentHealth;

/// A cited source backing an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Source filename
    pub filename: String,
    /// Position of the chunk within its document
    pub chunk_index: u32,
    /// Leading excerpt of the chunk, `...` appended when truncated
    #[serde(rename = "text")]
    pub excerpt: String,
    /// Cosine similarity rounded to 3 decimals
    pub relevance: f64,
}

impl Source {
    /// Build a source entry from a ranked chunk
    pub fn from_ranked(chunk: &RankedChunk, excerpt_chars: usize) -> Self {
        Self {
            filename: chunk.filename.clone(),
            chunk_index: chunk.chunk_index,
            excerpt: excerpt(&chunk.chunk_text, excerpt_chars),
            relevance: round_score(chunk.similarity_score),
        }
    }
}

/// First `max_chars` characters of `text`, with `...` when anything was cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => format!("{}...", &text[..byte_pos]),
        None => text.to_string(),
    }
}

/// Round a similarity score to 3 decimal places
pub fn round_score(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}

/// Response from `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Generated answer
    pub answer: String,
    /// Sources in ranked order
    pub sources: Vec<Source>,
}

/// Response from `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub document_id: i64,
    pub filename: String,
    pub chunks_created: usize,
}

impl IngestResponse {
    pub fn new(document_id: i64, filename: String, chunks_created: usize) -> Self {
        Self {
            message: "Document uploaded successfully".to_string(),
            document_id,
            filename,
            chunks_created,
        }
    }
}

/// Document entry in `GET /documents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            upload_date: doc.upload_timestamp,
        }
    }
}

/// Per-component status reported by `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthComponents {
    pub backend: ComponentHealth,
    pub database: ComponentHealth,
    pub llm: ComponentHealth,
}

/// Response from `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` when every component is, `degraded` otherwise
    pub status: &'static str,
    pub components: HealthComponents,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(components: HealthComponents) -> Self {
        let healthy = components.backend.is_healthy()
            && components.database.is_healthy()
            && components.llm.is_healthy();

        Self {
            status: if healthy { "healthy" } else { "degraded" },
            components,
            timestamp: Utc::now(),
        }
    }
}
