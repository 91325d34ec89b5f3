//! Retrieval pipeline: TF-IDF vector space and cosine ranking

pub mod ranker;
pub mod vectorizer;

pub use ranker::{cosine_similarity, rank, Scored};
pub use vectorizer::VectorSpace;

/// Dense weights, one per vocabulary term of the space that produced them
pub type Vector = Vec<f32>;
