pub mod orchestrator; // note → explanation → translation → PDFs
pub mod prompt_templates;
pub mod stages;

pub use orchestrator::{PipelineOutput, RenderedReport, ReportPipeline};
pub use prompt_templates::{SampleNote, SAMPLE_NOTES};
pub use stages::{NoopObserver, PipelineStage, StageObserver};

use thiserror::Error;

use crate::inference::InferenceError;
use crate::report::RenderError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Pipeline cancelled after {after:?}")]
    Cancelled { after: PipelineStage },
}
