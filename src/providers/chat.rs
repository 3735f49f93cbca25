//! Chat-completion client for an OpenAI-compatible endpoint
//!
//! Sends one user-role prompt per call with a response-length cap and returns
//! the first choice's message text. The caller-supplied credential, when
//! present, takes precedence over the configured key.

use crate::config::ProvidersConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seam for the model-generation provider, mockable in tests
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send one user-role prompt and return the raw assistant text.
    ///
    /// # Errors
    ///
    /// Returns an error when no credential is available, on network failure,
    /// non-2xx status, a malformed body or an empty choice list.
    async fn complete(&self, prompt: &str, api_key: Option<&str>) -> Result<String>;
}

/// HTTP client for the chat-completion endpoint
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl ChatClient {
    /// Create a new chat client from the provider configuration
    pub fn new(http: Client, providers: &ProvidersConfig) -> Self {
        Self {
            http,
            base_url: providers.chat_base_url.clone(),
            api_key: providers.chat_api_key.clone(),
            model: providers.chat_model.clone(),
            max_tokens: providers.max_tokens,
        }
    }
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn complete(&self, prompt: &str, api_key: Option<&str>) -> Result<String> {
        let Some(key) = api_key.or(self.api_key.as_deref()) else {
            bail!("no chat API key configured and none supplied by the caller");
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };
        debug!(model = %self.model, "Chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .with_context(|| "Chat completion request failed")?
            .error_for_status()
            .with_context(|| "Chat provider returned an error status")?;

        let parsed: ChatResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse chat completion response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Chat completion response contained no choices")
    }
}
