//! knowledge-qa: document Q&A with TF-IDF retrieval and source-cited answers
//!
//! Uploaded text is split into overlapping word windows and embedded in one
//! TF-IDF vector space fitted over the whole corpus. Questions are projected
//! into the same space, the closest chunks are ranked by cosine similarity,
//! and an external chat-completions model answers from those chunks alone.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod knowledge;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::QaConfig;
pub use error::{Error, Result};
pub use knowledge::KnowledgeBase;
pub use types::{
    document::{Chunk, Document},
    query::{QuestionRequest, RankedChunk},
    response::{AnswerResponse, Source},
};
