use axum::Json;

use crate::pipeline::{SampleNote, SAMPLE_NOTES};

/// `GET /api/samples`: example notes for the selector.
pub async fn list() -> Json<&'static [SampleNote]> {
    Json(SAMPLE_NOTES)
}
