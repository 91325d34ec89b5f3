//! Recording provider for tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

use super::llm::{ComponentHealth, LlmProvider};

/// Answers with a fixed string (or a fixed failure) and records every call
#[derive(Default)]
pub struct StubLlm {
    calls: AtomicUsize,
    last_context: Mutex<Option<String>>,
    failure: Option<String>,
}

impl StubLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose every call fails with an upstream error
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_context(&self) -> Option<String> {
        self.last_context.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock() = Some(context.to_string());

        match &self.failure {
            Some(message) => Err(Error::upstream(message.clone())),
            None => Ok(format!("stub answer to: {}", question)),
        }
    }

    async fn health_check(&self) -> ComponentHealth {
        match &self.failure {
            Some(message) => ComponentHealth::Unhealthy(message.clone()),
            None => ComponentHealth::Healthy,
        }
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
