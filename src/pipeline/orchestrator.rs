//! Report generation orchestrator.
//!
//! Drives one request end to end:
//! note → explanation → sanitize → English PDF → translation → sanitize → Korean PDF.
//!
//! The inference client and font provider are injected as trait objects so
//! the whole sequence runs against mocks in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::prompt_templates::{explanation_messages, follow_up_messages, translation_messages};
use super::stages::{PipelineStage, StageObserver};
use super::PipelineError;
use crate::inference::InferenceClient;
use crate::report::{compose_report, export_pdf_to_dir, render_pdf, FontProvider, RenderBlock, ReportVariant};
use crate::sanitize::{sanitize_text, SanitizedText};

// ═══════════════════════════════════════════════════════════
// Result types
// ═══════════════════════════════════════════════════════════

/// One finished report: the blocks shown on screen and the matching PDF.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub variant: ReportVariant,
    pub language: &'static str,
    pub screen_heading: &'static str,
    pub file_name: &'static str,
    pub body: SanitizedText,
    pub blocks: Vec<RenderBlock>,
    #[serde(rename = "pdf_base64", serialize_with = "serialize_base64")]
    pub pdf: Vec<u8>,
    /// Where the PDF was written when exports are enabled. Server-side only.
    #[serde(skip)]
    pub exported_to: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub request_id: Uuid,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub english: RenderedReport,
    pub korean: RenderedReport,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
}

// ═══════════════════════════════════════════════════════════
// Orchestrator
// ═══════════════════════════════════════════════════════════

pub struct ReportPipeline {
    client: Arc<dyn InferenceClient>,
    fonts: Arc<dyn FontProvider>,
    export_dir: Option<PathBuf>,
}

impl ReportPipeline {
    pub fn new(client: Arc<dyn InferenceClient>, fonts: Arc<dyn FontProvider>) -> Self {
        Self {
            client,
            fonts,
            export_dir: None,
        }
    }

    /// Also write every rendered PDF to `dir` as `<request-id>_<file name>`.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Generate both reports for `note`.
    ///
    /// Blocking. Nothing is returned unless every step succeeds; an English
    /// PDF rendered before a failed translation is discarded. Exports happen
    /// only once both reports exist, so a failed run leaves no file behind.
    pub fn run(
        &self,
        note: &str,
        observer: &dyn StageObserver,
    ) -> Result<PipelineOutput, PipelineError> {
        if note.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let request_id = Uuid::new_v4();
        let started = std::time::Instant::now();
        tracing::info!(
            request_id = %request_id,
            model = self.client.model(),
            note_chars = note.chars().count(),
            "Report generation: requesting explanation"
        );

        let explanation = sanitize_text(&self.client.complete(&explanation_messages(note))?);
        notify(observer, PipelineStage::ExplanationReceived)?;

        let mut english = self.render(
            request_id,
            ReportVariant::PatientFacingEnglish,
            explanation.clone(),
        )?;
        notify(observer, PipelineStage::EnglishReportRendered)?;

        tracing::info!(
            request_id = %request_id,
            explanation_chars = explanation.chars().count(),
            "Report generation: requesting translation"
        );
        let translation = sanitize_text(&self.client.complete(&translation_messages(&explanation))?);
        notify(observer, PipelineStage::TranslationReceived)?;

        let mut korean = self.render(request_id, ReportVariant::TranslatedKorean, translation)?;
        notify(observer, PipelineStage::KoreanReportRendered)?;

        if let Some(dir) = &self.export_dir {
            self.export_both(dir, request_id, &mut english, &mut korean)?;
        }

        tracing::info!(
            request_id = %request_id,
            english_pdf_bytes = english.pdf.len(),
            korean_pdf_bytes = korean.pdf.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Report generation complete"
        );

        Ok(PipelineOutput {
            request_id,
            model: self.client.model().to_string(),
            generated_at: Utc::now(),
            english,
            korean,
        })
    }

    /// Answer a patient question about `note`. Blocking.
    pub fn ask_follow_up(&self, note: &str, question: &str) -> Result<SanitizedText, PipelineError> {
        if note.trim().is_empty() || question.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        tracing::info!(
            question_chars = question.chars().count(),
            "Follow-up question submitted"
        );
        let answer = self.client.complete(&follow_up_messages(note, question))?;
        Ok(sanitize_text(&answer))
    }

    fn render(
        &self,
        request_id: Uuid,
        variant: ReportVariant,
        body: SanitizedText,
    ) -> Result<RenderedReport, PipelineError> {
        let composed = compose_report(variant, &body);
        let pdf = render_pdf(&composed, self.fonts.as_ref())?;
        tracing::debug!(
            request_id = %request_id,
            variant = variant.as_str(),
            bytes = pdf.len(),
            "PDF rendered"
        );

        Ok(RenderedReport {
            variant,
            language: variant.language(),
            screen_heading: variant.screen_heading(),
            file_name: variant.file_name(),
            body,
            blocks: composed.blocks,
            pdf,
            exported_to: None,
        })
    }

    /// Write both PDFs, removing the first if the second cannot be written.
    fn export_both(
        &self,
        dir: &Path,
        request_id: Uuid,
        english: &mut RenderedReport,
        korean: &mut RenderedReport,
    ) -> Result<(), PipelineError> {
        let english_path = export_pdf_to_dir(&english.pdf, dir, &export_name(request_id, english))?;
        match export_pdf_to_dir(&korean.pdf, dir, &export_name(request_id, korean)) {
            Ok(korean_path) => {
                english.exported_to = Some(english_path);
                korean.exported_to = Some(korean_path);
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&english_path) {
                    tracing::warn!(
                        path = %english_path.display(),
                        error = %cleanup,
                        "Failed to remove partial export"
                    );
                }
                Err(e.into())
            }
        }
    }
}

fn export_name(request_id: Uuid, report: &RenderedReport) -> String {
    format!("{request_id}_{}", report.file_name)
}

fn notify(observer: &dyn StageObserver, stage: PipelineStage) -> Result<(), PipelineError> {
    if observer.stage_completed(stage) {
        Ok(())
    } else {
        tracing::info!(after = ?stage, "Report generation cancelled by caller");
        Err(PipelineError::Cancelled { after: stage })
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
