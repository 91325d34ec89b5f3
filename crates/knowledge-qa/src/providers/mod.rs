//! Provider abstraction for the external answer generator
//!
//! The retrieval core only depends on [`LlmProvider`]; the chat-completions
//! client is the production implementation.

pub mod chat_completions;
pub mod llm;
#[cfg(test)]
pub(crate) mod stub;

pub use chat_completions::ChatCompletionsClient;
pub use llm::{ComponentHealth, LlmProvider};
