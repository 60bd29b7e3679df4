//! PDF rendering of composed reports via `printpdf`.
//!
//! A4 portrait, 10 mm margins. Blocks are drawn top to bottom; a block's
//! text is word-wrapped to the printable width and a fresh page is started
//! when the next line would run into the bottom margin.

use std::collections::HashMap;
use std::io::BufWriter;

use printpdf::{
    Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rgb,
};

use super::compose::{Alignment, ComposedReport, Emphasis, RenderBlock, RgbColor};
use super::fonts::{FontProvider, FontSource};
use super::RenderError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const PRINTABLE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const LAYER_NAME: &str = "Layer 1";

/// Cap height relative to the font size, used to centre text in its line box.
const CAP_HEIGHT_RATIO: f32 = 0.7;
const PT_TO_MM: f32 = 0.352_778;

struct LoadedFont {
    font_ref: IndirectFontRef,
    source: FontSource,
}

/// Tracks the current layer and vertical position.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Top of the next line box, measured from the bottom edge.
    top_mm: f32,
    pages: usize,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            top_mm: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        }
    }

    fn ensure_room(&mut self, line_height_mm: f32) {
        if self.top_mm - line_height_mm < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.top_mm = PAGE_HEIGHT_MM - MARGIN_MM;
            self.pages += 1;
        }
    }

    fn draw_line(&mut self, text: &str, block: &RenderBlock, font: &LoadedFont) {
        let style = &block.style;
        self.ensure_room(style.line_height_mm);

        if !text.is_empty() {
            let width = font.source.text_width_mm(text, style.font_size_pt);
            let x = match style.alignment {
                Alignment::Left => MARGIN_MM,
                Alignment::Center => MARGIN_MM + ((PRINTABLE_WIDTH_MM - width) / 2.0).max(0.0),
                Alignment::Right => MARGIN_MM + (PRINTABLE_WIDTH_MM - width).max(0.0),
            };
            let cap_mm = style.font_size_pt * PT_TO_MM * CAP_HEIGHT_RATIO;
            let baseline = self.top_mm - (style.line_height_mm + cap_mm) / 2.0;

            self.layer.set_fill_color(pdf_color(style.color));
            self.layer
                .use_text(text, style.font_size_pt, Mm(x), Mm(baseline), &font.font_ref);
        }

        self.top_mm -= style.line_height_mm;
    }

    fn skip(&mut self, gap_mm: f32) {
        self.top_mm -= gap_mm;
    }
}

fn pdf_color(c: RgbColor) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(c.0) / 255.0,
        f32::from(c.1) / 255.0,
        f32::from(c.2) / 255.0,
        None,
    ))
}

fn load_font(doc: &PdfDocumentReference, source: FontSource) -> Result<LoadedFont, RenderError> {
    let font_ref = match &source {
        FontSource::Builtin(builtin) => doc.add_builtin_font(*builtin),
        FontSource::External(data) => doc.add_external_font(&data[..]),
    }
    .map_err(|e| RenderError::Pdf(format!("PDF font error: {e}")))?;
    Ok(LoadedFont { font_ref, source })
}

/// Render a composed report. Returns PDF bytes.
pub fn render_pdf(
    report: &ComposedReport,
    fonts: &dyn FontProvider,
) -> Result<Vec<u8>, RenderError> {
    let title = report
        .blocks
        .first()
        .map(|b| b.text.as_str())
        .unwrap_or("Report");
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);

    let pages = draw_blocks(&doc, doc.get_page(page1).get_layer(layer1), report, fonts)?;
    tracing::debug!(variant = %report.variant, pages, "PDF laid out");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| RenderError::Pdf(format!("PDF buffer error: {e}")))
}

fn draw_blocks(
    doc: &PdfDocumentReference,
    first_layer: PdfLayerReference,
    report: &ComposedReport,
    fonts: &dyn FontProvider,
) -> Result<usize, RenderError> {
    let mut loaded: HashMap<Emphasis, LoadedFont> = HashMap::new();
    for block in &report.blocks {
        let emphasis = block.style.emphasis;
        if !loaded.contains_key(&emphasis) {
            let source = fonts.resolve(report.font_family, emphasis)?;
            loaded.insert(emphasis, load_font(doc, source)?);
        }
    }

    let mut cursor = PageCursor::new(doc, first_layer);
    for block in &report.blocks {
        let font = &loaded[&block.style.emphasis];
        let lines = wrap_text(&block.text, PRINTABLE_WIDTH_MM, |s| {
            font.source.text_width_mm(s, block.style.font_size_pt)
        });
        for line in &lines {
            cursor.draw_line(line, block, font);
        }
        cursor.skip(block.style.space_after_mm);
    }

    Ok(cursor.pages)
}

/// Word-wrap `text` so every line measures at most `max_width`.
///
/// Embedded newlines are hard breaks and blank lines are kept as empty
/// lines. A single word wider than a line is split by character. Always
/// returns at least one line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    let mut next = current.clone();
                    next.push(c);
                    if measure(&next) > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = next;
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}
