//! OpenAI-compatible chat-completions client (Groq by default)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::llm::{ComponentHealth, LlmProvider};

/// Chat-completions client; one request per question, no retries
pub struct ChatCompletionsClient {
    /// HTTP client carrying the request timeout
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatCompletionsClient {
    /// Create a new client; the credential may be absent until the first query
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::UpstreamUnavailable("GROQ_API_KEY not configured".to_string()))
    }

    fn map_transport_error(&self, err: reqwest::Error, timeout_secs: u64) -> Error {
        if err.is_timeout() {
            Error::UpstreamTimeout(timeout_secs)
        } else {
            Error::upstream(format!("request failed: {}", err))
        }
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsClient {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let user_prompt = PromptBuilder::build_qa_prompt(question, context);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: PromptBuilder::system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: Some(self.config.temperature),
            max_tokens: self.config.max_tokens,
        };

        tracing::info!("Generating answer with model: {}", self.config.model);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(format!("{} - {}", status.as_u16(), body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e, self.config.timeout_secs))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::upstream("response contained no choices"))
    }

    async fn health_check(&self) -> ComponentHealth {
        let api_key = match self.api_key() {
            Ok(key) => key,
            Err(_) => return ComponentHealth::Unhealthy("API key not configured".to_string()),
        };

        let request = ChatRequest {
            model: &self.config.health_model,
            messages: vec![ChatMessage {
                role: "user",
                content: "test",
            }],
            temperature: None,
            max_tokens: 5,
        };

        let result = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(self.config.health_timeout_secs))
            .json(&request)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => ComponentHealth::Healthy,
            Ok(response) => {
                ComponentHealth::Unhealthy(format!("status {}", response.status().as_u16()))
            }
            Err(e) => ComponentHealth::Unhealthy(e.to_string()),
        }
    }

    fn name(&self) -> &str {
        "chat-completions"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
