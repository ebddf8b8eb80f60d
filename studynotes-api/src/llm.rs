//! Chat-completion client
//!
//! The service only needs "run prompt, get text". The provider sits behind
//! [`CompletionClient`] so handlers and tests can swap in a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature used for every prompt
pub const TEMPERATURE: f64 = 0.2;

/// Errors from LLM clients
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No API key configured")]
    MissingApiKey,
}

/// Text completion provider
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a single prompt and return the model's text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat-completion client
///
/// Built without a key, every call fails with [`LlmError::MissingApiKey`]
/// so routes that never prompt keep working.
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Missing content".to_string()))
    }
}
