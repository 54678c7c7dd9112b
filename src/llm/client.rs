use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, warn};

use super::dto::{ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope};
use super::error::CompletionError;
use crate::config::LlmConfig;

#[async_trait]
pub trait Completer: Send + Sync {
    /// Sends one system + user exchange and returns the first choice's text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    config: LlmConfig,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_request(&self, system: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn error_from(response: Response) -> CompletionError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimit(message),
            _ => CompletionError::Backend(message),
        }
    }
}

#[async_trait]
impl Completer for GroqClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let body = self.to_request(system, prompt);
        debug!(model = %body.model, prompt_len = prompt.len(), "sending chat completion");

        let response = self
            .client
            .post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from(response).await;
            warn!(error = %err, "chat completion failed");
            return Err(err);
        }

        let text = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}
