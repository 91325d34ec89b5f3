//! Query request types

use serde::{Deserialize, Serialize};

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// The question to answer
    pub question: String,
}

impl QuestionRequest {
    /// Whether the question has any non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }
}

/// A chunk selected for one query, carrying its provenance and score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub chunk_text: String,
    pub filename: String,
    pub chunk_index: u32,
    pub similarity_score: f32,
}
