use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::LlmSettings;
use crate::errors::{Result, StoryForgeError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub content: String,
    pub usage: Option<UsageMetrics>,
    pub raw: Value,
}

/// A chat-completion backend. One call, one response, no retries.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;
}

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiChatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        settings.validate()?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("StoryForge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = settings
            .base_url_override()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn uses_default_endpoint(&self) -> bool {
        self.base_url == DEFAULT_OPENAI_BASE_URL
    }

    pub fn completions_url(&self) -> String {
        completions_url(&self.base_url)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let payload = serde_json::json!({
            "model": self.model.clone(),
            "messages": normalise_messages(messages),
            "temperature": self.temperature,
        });

        log::debug!("requesting story completion from {}", self.base_url);
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoryForgeError::ModelStatus {
                status: status.as_u16(),
                body,
            });
        }
        let body: Value = response.json().await?;

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|val| val.as_str())
            .unwrap_or_default()
            .to_string();
        if content.trim().is_empty() {
            return Err(StoryForgeError::EmptyCompletion);
        }

        Ok(ChatResponse {
            model: self.model.clone(),
            usage: extract_openai_usage(&body),
            content,
            raw: body,
        })
    }
}

/// Base URLs that already carry the `/v1` prefix are used as-is.
pub fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

fn normalise_messages(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let role = match m.role.to_lowercase().as_str() {
                "system" => "system",
                "assistant" => "assistant",
                _ => "user",
            };
            serde_json::json!({
                "role": role,
                "content": m.content,
            })
        })
        .collect()
}

fn extract_openai_usage(body: &Value) -> Option<UsageMetrics> {
    let read = |usage: &Value, key: &str| {
        usage
            .get(key)
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
    };
    body.get("usage").map(|usage| UsageMetrics {
        prompt_tokens: read(usage, "prompt_tokens"),
        completion_tokens: read(usage, "completion_tokens"),
        total_tokens: read(usage, "total_tokens"),
    })
}
