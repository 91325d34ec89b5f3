//! LLM provider trait for generating answers

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Health of an individual component, reported by `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ComponentHealth {
    Healthy,
    Unhealthy(String),
}

impl ComponentHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl From<ComponentHealth> for String {
    fn from(health: ComponentHealth) -> Self {
        match health {
            ComponentHealth::Healthy => "healthy".to_string(),
            ComponentHealth::Unhealthy(reason) => format!("unhealthy: {}", reason),
        }
    }
}

/// Trait for context-grounded answer generation
///
/// Implementations must not retry; failures are terminal for the query.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer to `question` using only `context`
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Probe the upstream service
    async fn health_check(&self) -> ComponentHealth;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
