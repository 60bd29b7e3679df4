//! `POST /api/follow-up`: free-form patient question about a note.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, EMPTY_NOTE_MESSAGE, EMPTY_QUESTION_MESSAGE};
use crate::api::types::ApiContext;
use crate::sanitize::SanitizedText;

#[derive(Deserialize)]
pub struct FollowUpRequest {
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Serialize)]
pub struct FollowUpResponse {
    pub answer: SanitizedText,
}

pub async fn ask(
    State(ctx): State<ApiContext>,
    payload: Result<Json<FollowUpRequest>, JsonRejection>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let Json(req) = payload?;
    if req.note.trim().is_empty() {
        return Err(ApiError::EmptyInput(EMPTY_NOTE_MESSAGE));
    }
    if req.question.trim().is_empty() {
        return Err(ApiError::EmptyInput(EMPTY_QUESTION_MESSAGE));
    }

    let pipeline = ctx.pipeline.clone();
    let answer = tokio::task::spawn_blocking(move || {
        pipeline.ask_follow_up(&req.note, &req.question)
    })
    .await?
    .map_err(|e| ApiError::from_pipeline(e, EMPTY_QUESTION_MESSAGE))?;

    Ok(Json(FollowUpResponse { answer }))
}
