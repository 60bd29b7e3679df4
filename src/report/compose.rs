//! Report composition: sanitized body + variant template → ordered render
//! blocks shared by the browser view and the PDF renderer.

use serde::Serialize;

use super::variant::ReportVariant;
use crate::sanitize::SanitizedText;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Title,
    Heading,
    Body,
    Disclaimer,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// 8-bit RGB colour. Serializes as its CSS hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl Serialize for RgbColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl RgbColor {
    /// CSS hex form, e.g. `#003366`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const NAVY: RgbColor = RgbColor(0, 51, 102);
const GRAY: RgbColor = RgbColor(100, 100, 100);
const LIGHT_GRAY: RgbColor = RgbColor(120, 120, 120);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockStyle {
    pub font_size_pt: f32,
    pub emphasis: Emphasis,
    pub color: RgbColor,
    pub alignment: Alignment,
    /// Vertical advance per wrapped line.
    pub line_height_mm: f32,
    /// Extra gap below the block.
    pub space_after_mm: f32,
}

/// One render instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBlock {
    pub kind: BlockKind,
    pub text: String,
    pub style: BlockStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedReport {
    pub variant: ReportVariant,
    pub font_family: &'static str,
    pub blocks: Vec<RenderBlock>,
}

// ═══════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════

/// Build the fixed block sequence for `variant` around `body`.
///
/// Always title, heading, body, disclaimer, footer, in that order. The body
/// is not inspected.
pub fn compose_report(variant: ReportVariant, body: &SanitizedText) -> ComposedReport {
    let template = variant.template();

    let blocks = vec![
        RenderBlock {
            kind: BlockKind::Title,
            text: template.title.to_string(),
            style: BlockStyle {
                font_size_pt: variant.title_size(),
                emphasis: Emphasis::Regular,
                color: NAVY,
                alignment: Alignment::Center,
                line_height_mm: 12.0,
                space_after_mm: 8.0,
            },
        },
        RenderBlock {
            kind: BlockKind::Heading,
            text: template.heading.to_string(),
            style: BlockStyle {
                font_size_pt: 14.0,
                emphasis: Emphasis::Bold,
                color: NAVY,
                alignment: Alignment::Center,
                line_height_mm: 10.0,
                space_after_mm: 0.0,
            },
        },
        RenderBlock {
            kind: BlockKind::Body,
            text: body.as_str().to_string(),
            style: BlockStyle {
                font_size_pt: 12.0,
                emphasis: Emphasis::Regular,
                color: NAVY,
                alignment: Alignment::Left,
                line_height_mm: 8.0,
                space_after_mm: 4.0,
            },
        },
        RenderBlock {
            kind: BlockKind::Disclaimer,
            text: template.disclaimer.to_string(),
            style: BlockStyle {
                font_size_pt: 10.0,
                emphasis: Emphasis::Italic,
                color: GRAY,
                alignment: Alignment::Left,
                line_height_mm: 6.0,
                space_after_mm: 3.0,
            },
        },
        RenderBlock {
            kind: BlockKind::Footer,
            text: template.attribution.to_string(),
            style: BlockStyle {
                font_size_pt: 10.0,
                emphasis: Emphasis::Italic,
                color: LIGHT_GRAY,
                alignment: Alignment::Right,
                line_height_mm: 6.0,
                space_after_mm: 0.0,
            },
        },
    ];

    ComposedReport {
        variant,
        font_family: variant.font_family(),
        blocks,
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize_text;

    fn kinds(report: &ComposedReport) -> Vec<BlockKind> {
        report.blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn block_order_is_fixed() {
        for variant in ReportVariant::all() {
            let report = compose_report(*variant, &sanitize_text("body"));
            assert_eq!(
                kinds(&report),
                vec![
                    BlockKind::Title,
                    BlockKind::Heading,
                    BlockKind::Body,
                    BlockKind::Disclaimer,
                    BlockKind::Footer,
                ]
            );
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let body = sanitize_text("Your blood pressure is high.\n\nWalk 30 minutes a day.");
        let first = compose_report(ReportVariant::PatientFacingEnglish, &body);
        for _ in 0..5 {
            assert_eq!(compose_report(ReportVariant::PatientFacingEnglish, &body), first);
        }
    }

    #[test]
    fn body_is_carried_verbatim() {
        let body = sanitize_text("혈압이 높습니다.");
        let report = compose_report(ReportVariant::TranslatedKorean, &body);
        assert_eq!(report.blocks[2].text, "혈압이 높습니다.");
    }

    #[test]
    fn empty_body_still_yields_full_sequence() {
        let report = compose_report(ReportVariant::PatientFacingEnglish, &sanitize_text(""));
        assert_eq!(report.blocks.len(), 5);
        assert!(report.blocks[2].text.is_empty());
    }

    #[test]
    fn styles_match_layout() {
        let report = compose_report(ReportVariant::PatientFacingEnglish, &sanitize_text("x"));
        let heading = &report.blocks[1].style;
        assert_eq!(heading.emphasis, Emphasis::Bold);
        assert_eq!(heading.alignment, Alignment::Center);

        let disclaimer = &report.blocks[3].style;
        assert_eq!(disclaimer.emphasis, Emphasis::Italic);
        assert_eq!(disclaimer.color, RgbColor(100, 100, 100));

        let footer = &report.blocks[4].style;
        assert_eq!(footer.alignment, Alignment::Right);
        assert_eq!(footer.emphasis, Emphasis::Italic);
    }

    #[test]
    fn variants_differ_in_template_and_font_only() {
        let body = sanitize_text("same body");
        let en = compose_report(ReportVariant::PatientFacingEnglish, &body);
        let ko = compose_report(ReportVariant::TranslatedKorean, &body);
        assert_eq!(en.font_family, "DejaVu");
        assert_eq!(ko.font_family, "NotoSansKR");
        assert_eq!(en.blocks[2], ko.blocks[2]);
        assert_ne!(en.blocks[1].text, ko.blocks[1].text);
        assert_eq!(en.blocks[0].style.font_size_pt, 14.0);
        assert_eq!(ko.blocks[0].style.font_size_pt, 12.0);
    }

    #[test]
    fn color_hex() {
        assert_eq!(RgbColor(0, 51, 102).to_hex(), "#003366");
    }

    #[test]
    fn blocks_serialize_for_the_browser() {
        let report = compose_report(ReportVariant::PatientFacingEnglish, &sanitize_text("x"));
        let json = serde_json::to_value(&report.blocks[0]).unwrap();
        assert_eq!(json["kind"], "title");
        assert_eq!(json["style"]["color"], "#003366");
        assert_eq!(json["style"]["alignment"], "center");
    }
}
