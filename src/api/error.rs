//! API error types with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Inline validation message for a blank note.
pub const EMPTY_NOTE_MESSAGE: &str = "Doctor's note 를 먼저 기입해주세요.";
pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";

/// Structured error response body for the browser client.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Rendering failed: {0}")]
    RenderFailed(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyInput(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InferenceFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::RenderFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire code and client-facing message. Upstream details are logged
    /// here and never forwarded.
    pub fn detail(&self) -> ErrorDetail {
        let (code, message) = match self {
            ApiError::EmptyInput(message) => ("EMPTY_INPUT", message.to_string()),
            ApiError::InferenceFailed(detail) => {
                tracing::error!(detail, "Inference request failed");
                (
                    "INFERENCE_FAILED",
                    "The language model could not be reached. Please try again.".to_string(),
                )
            }
            ApiError::RenderFailed(detail) => {
                tracing::error!(detail, "Report rendering failed");
                (
                    "RENDER_FAILED",
                    "The PDF report could not be generated.".to_string(),
                )
            }
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                ("INTERNAL", "An internal error occurred".to_string())
            }
        };
        ErrorDetail { code, message }
    }

    /// Map a pipeline failure, choosing the empty-input message for the
    /// endpoint that produced it.
    pub fn from_pipeline(err: PipelineError, empty_message: &'static str) -> Self {
        match err {
            PipelineError::EmptyInput => ApiError::EmptyInput(empty_message),
            PipelineError::Inference(e) => ApiError::InferenceFailed(e.to_string()),
            PipelineError::Render(e) => ApiError::RenderFailed(e.to_string()),
            PipelineError::Cancelled { after } => {
                ApiError::Internal(format!("cancelled after {after:?}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::from_pipeline(err, EMPTY_NOTE_MESSAGE)
    }
}

/// Malformed bodies, wrong content types and missing fields all answer
/// with the same JSON error shape as every other failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {err}"))
    }
}
