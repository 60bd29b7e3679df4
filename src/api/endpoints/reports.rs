//! Report generation endpoints.
//!
//! - `POST /api/reports`: run the pipeline, return both reports as JSON
//! - `POST /api/reports/stream`: same run, as server-sent events: one
//!   `stage` event per completed step, then a single `result` or `error`

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::error::{ApiError, ErrorBody, EMPTY_NOTE_MESSAGE};
use crate::api::types::ApiContext;
use crate::pipeline::{NoopObserver, PipelineError, PipelineOutput, PipelineStage};

#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub note: String,
}

/// `POST /api/reports`
pub async fn generate(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<PipelineOutput>, ApiError> {
    let Json(req) = payload?;
    if req.note.trim().is_empty() {
        return Err(ApiError::EmptyInput(EMPTY_NOTE_MESSAGE));
    }

    let pipeline = ctx.pipeline.clone();
    let output =
        tokio::task::spawn_blocking(move || pipeline.run(&req.note, &NoopObserver)).await??;
    Ok(Json(output))
}

// ═══════════════════════════════════════════════════════════
// Streaming variant
// ═══════════════════════════════════════════════════════════

#[derive(Serialize)]
struct StageEvent {
    stage: PipelineStage,
    label: &'static str,
    percent: u8,
}

impl From<PipelineStage> for StageEvent {
    fn from(stage: PipelineStage) -> Self {
        Self {
            stage,
            label: stage.label(),
            percent: stage.percent(),
        }
    }
}

enum Progress {
    Running {
        stages: mpsc::Receiver<PipelineStage>,
        run: JoinHandle<Result<PipelineOutput, PipelineError>>,
    },
    Finished,
}

/// `POST /api/reports/stream`
///
/// A blank note or malformed body is rejected with a plain JSON 400 before
/// the stream opens.
/// Dropping the connection closes the stage channel, which cancels the run
/// before its next inference call.
pub async fn stream(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(req) = payload?;
    if req.note.trim().is_empty() {
        return Err(ApiError::EmptyInput(EMPTY_NOTE_MESSAGE));
    }

    let (tx, rx) = mpsc::channel::<PipelineStage>(PipelineStage::ALL.len());
    let pipeline = ctx.pipeline.clone();
    let run = tokio::task::spawn_blocking(move || pipeline.run(&req.note, &tx));

    let events = futures_util::stream::unfold(
        Progress::Running { stages: rx, run },
        next_event,
    );
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn next_event(state: Progress) -> Option<(Result<Event, Infallible>, Progress)> {
    let Progress::Running { mut stages, run } = state else {
        return None;
    };

    if let Some(stage) = stages.recv().await {
        let event = json_event("stage", &StageEvent::from(stage));
        return Some((Ok(event), Progress::Running { stages, run }));
    }

    // Channel closed: the blocking run has returned.
    let event = match run.await {
        Ok(Ok(output)) => json_event("result", &output),
        Ok(Err(err)) => error_event(ApiError::from(err)),
        Err(join) => error_event(ApiError::from(join)),
    };
    Some((Ok(event), Progress::Finished))
}

fn error_event(err: ApiError) -> Event {
    json_event("error", &ErrorBody { error: err.detail() })
}

fn json_event<T: Serialize>(name: &str, payload: &T) -> Event {
    match Event::default().event(name).json_data(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(event = name, error = %e, "Failed to encode SSE payload");
            Event::default()
                .event("error")
                .data(r#"{"error":{"code":"INTERNAL","message":"An internal error occurred"}}"#)
        }
    }
}
