//! Chat fallback
//!
//! Messages no other intent claims go to an OpenAI-style
//! `/chat/completions` endpoint (OpenRouter by default) with a fixed
//! Vietnamese persona as the system message.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use ruby_config::ChatConfig;

use crate::AgentError;

/// Chat service seam
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Single-turn reply to a user message
    async fn reply(&self, message: &str) -> Result<String, AgentError>;
}

/// Configuration for OpenRouter-compatible backends
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API root (OpenRouter: https://openrouter.ai/api/v1)
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Model name (openai/gpt-3.5-turbo, ...)
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for OpenRouterConfig {
    fn from(config: &ChatConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

impl OpenRouterConfig {
    /// Set endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// OpenRouter-compatible chat backend
pub struct OpenRouterBackend {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterBackend {
    pub fn new(config: OpenRouterConfig) -> Result<Self, AgentError> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("Chat API key not set; chat fallback will fail");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_headers(&self, api_key: &str) -> Result<HeaderMap, AgentError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| AgentError::Configuration(format!("invalid API key: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ChatBackend for OpenRouterBackend {
    async fn reply(&self, message: &str) -> Result<String, AgentError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AgentError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers(api_key)?)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Chat(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Chat completion failed");
            return Err(AgentError::Chat(format!("HTTP {}: {}", status, error_text)));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AgentError::InvalidResponse("No choices in response".to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chat completion received"
        );

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
