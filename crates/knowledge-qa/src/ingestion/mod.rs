//! Document ingestion: word-window chunking

mod chunker;

pub use chunker::WordChunker;
