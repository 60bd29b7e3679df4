use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, InferenceClient, InferenceError};
use crate::config::AppConfig;

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, InferenceError> {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model,
            config.timeout_secs,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Request body for `/chat/completions`
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Response body from `/chat/completions`
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl InferenceClient for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let started = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    InferenceError::Connection(self.base_url.clone())
                } else {
                    InferenceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        tracing::debug!(
            model = %self.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion returned"
        );

        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(InferenceError::Unauthorized)
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(InferenceError::RateLimited),
            _ => {
                let body = response.text().unwrap_or_default();
                return Err(InferenceError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
