//! Core types for documents, chunks, queries and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, NewChunk};
pub use query::{QuestionRequest, RankedChunk};
pub use response::{
    AnswerResponse, DocumentSummary, HealthComponents, HealthResponse, IngestResponse, Source,
};
