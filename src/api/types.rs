//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::pipeline::ReportPipeline;

/// Shared context for all routes and middleware.
///
/// Requests share nothing mutable: each one gets its own pipeline run and
/// its own in-memory PDFs.
#[derive(Clone)]
pub struct ApiContext {
    pub pipeline: Arc<ReportPipeline>,
}

impl ApiContext {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
