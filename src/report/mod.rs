//! Report assembly: templates, block composition, fonts, and PDF output.

pub mod compose;
pub mod export;
pub mod fonts;
pub mod pdf;
pub mod variant;

pub use compose::*;
pub use export::export_pdf_to_dir;
pub use fonts::{BuiltinFontProvider, DirectoryFontProvider, FontProvider, FontSource};
pub use pdf::render_pdf;
pub use variant::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font {family} ({emphasis:?}) is not available")]
    FontUnavailable { family: String, emphasis: Emphasis },

    #[error("Font file {path} could not be parsed: {reason}")]
    FontParse { path: String, reason: String },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
