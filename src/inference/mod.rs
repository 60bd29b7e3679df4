//! Remote language-model boundary.
//!
//! The rest of the crate only sees [`InferenceClient`]: an ordered list of
//! role/content messages goes in, free text comes out. No schema is
//! enforced on the reply.

pub mod mock;
pub mod openai;

pub use mock::{FailingInferenceClient, MockInferenceClient};
pub use openai::OpenAiClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Cannot reach inference endpoint at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference endpoint rejected the API key")]
    Unauthorized,

    #[error("Inference quota or rate limit exceeded")]
    RateLimited,

    #[error("Inference endpoint returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Model returned an empty completion")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A blocking chat-completion backend.
///
/// Calls may take many seconds; async callers should run them on a
/// blocking thread.
pub trait InferenceClient: Send + Sync {
    /// Send `messages` and return the completion text, trimmed.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}
