//! Language-model provider client
//!
//! Every AI feature (readiness refinement, chat, scheduling, focus coaching)
//! is one prompt in, one text reply out. [`LanguageModel`] is that seam;
//! [`AnthropicClient`] implements it against the Anthropic Messages API.

use async_trait::async_trait;
use sb_common::config::AiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = concat!("study-buddy/", env!("CARGO_PKG_VERSION"));
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MESSAGES_PATH: &str = "/v1/messages";

/// AI call errors
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured
    #[error("AI API key not configured")]
    NotConfigured,

    /// Transport failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Reply could not be interpreted (bad envelope, missing or mistyped fields)
    #[error("Malformed reply: {0}")]
    Protocol(String),
}

impl AiError {
    /// True when the provider answered but the content was unusable
    pub fn is_protocol(&self) -> bool {
        matches!(self, AiError::Protocol(_))
    }
}

/// Single-shot text completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one system prompt and one user message, return the reply text
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Anthropic Messages API client
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Build a client from resolved configuration
    ///
    /// The request timeout comes from `config.timeout`; the orchestrator
    /// itself never times out a call.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), MESSAGES_PATH),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending AI request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "AI provider returned error status");
            return Err(AiError::Api(status.as_u16(), error_text));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AiError::Protocol(format!("Unreadable response envelope: {}", e)))?;

        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AiError::Protocol("Reply contained no text".to_string()));
        }

        tracing::debug!(reply_len = text.len(), "Received AI reply");

        Ok(text)
    }
}
