use crate::config::ChatConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Seam over the external chat-completion API, so handlers and tests can
/// swap in doubles.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// One-shot completion: system persona + single user message.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, ApiError>;
}

/// Client for a DeepSeek-compatible `/chat/completions` endpoint.
pub struct DeepSeekProvider {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl DeepSeekProvider {
    pub fn new(config: &ChatConfig, api_key: String) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, ApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat API error {}: {}", status, body);
            return Err(ApiError::upstream(format!(
                "chat API returned {}",
                status
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ApiError::upstream("chat API returned an empty completion"));
        }

        Ok(content)
    }
}
