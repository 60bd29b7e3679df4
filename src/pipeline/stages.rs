//! Progress events emitted while a report is being generated.

use serde::Serialize;
use tokio::sync::mpsc;

/// Completed pipeline step, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    ExplanationReceived,
    EnglishReportRendered,
    TranslationReceived,
    KoreanReportRendered,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::ExplanationReceived,
        PipelineStage::EnglishReportRendered,
        PipelineStage::TranslationReceived,
        PipelineStage::KoreanReportRendered,
    ];

    /// Share of the run finished once this stage is reached, in percent.
    pub fn percent(&self) -> u8 {
        match self {
            PipelineStage::ExplanationReceived => 25,
            PipelineStage::EnglishReportRendered => 50,
            PipelineStage::TranslationReceived => 75,
            PipelineStage::KoreanReportRendered => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::ExplanationReceived => "Explanation received",
            PipelineStage::EnglishReportRendered => "English report rendered",
            PipelineStage::TranslationReceived => "Korean translation received",
            PipelineStage::KoreanReportRendered => "Korean report rendered",
        }
    }
}

/// Receives stage events from a running pipeline.
///
/// Returning `false` means nobody is listening any more; the pipeline stops
/// before its next remote call.
pub trait StageObserver {
    fn stage_completed(&self, stage: PipelineStage) -> bool;
}

/// Observer for callers that only want the final result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn stage_completed(&self, _stage: PipelineStage) -> bool {
        true
    }
}

/// Forwards stages to an async consumer. Must be called from a blocking
/// thread; a closed receiver cancels the run.
impl StageObserver for mpsc::Sender<PipelineStage> {
    fn stage_completed(&self, stage: PipelineStage) -> bool {
        self.blocking_send(stage).is_ok()
    }
}
