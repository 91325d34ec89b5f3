//! Document and chunk records as persisted by the document store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::retrieval::Vector;

/// An uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier
    pub id: i64,
    /// Original filename
    pub filename: String,
    /// Full UTF-8 text
    pub raw_text: String,
    /// Upload time
    pub upload_timestamp: DateTime<Utc>,
}

/// A stored chunk with its vector in the current space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Store-assigned identifier
    pub id: i64,
    /// Owning document
    pub document_id: i64,
    /// Chunk text
    pub text: String,
    /// 0-based position within the document (citation display only)
    pub index: u32,
    /// TF-IDF weights, one per vocabulary term
    pub vector: Vector,
}

/// A chunk that has not been written to the store yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewChunk {
    pub text: String,
    pub index: u32,
    pub vector: Vector,
}
