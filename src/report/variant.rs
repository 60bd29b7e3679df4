use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed strings printed around the model's body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTemplate {
    pub title: &'static str,
    pub heading: &'static str,
    pub disclaimer: &'static str,
    pub attribution: &'static str,
}

// ═══════════════════════════════════════════════════════════
// Templates
// ═══════════════════════════════════════════════════════════

const ENGLISH_TEMPLATE: ReportTemplate = ReportTemplate {
    title: "Patient Report",
    heading: "Patient-Friendly Translation",
    disclaimer: "Disclaimer: This report is for educational purposes only and not a substitute for professional medical advice.",
    attribution: "Created by Ha-neul Jung | Data source: WHO, CDC, publicly available datasets",
};

const KOREAN_TEMPLATE: ReportTemplate = ReportTemplate {
    title: "Patient Report",
    heading: "환자 친화적 설명",
    disclaimer: "면책 조항: 이 보고서는 전문적인 의학적 조언을 대신하는 것이 아니라 교육 목적으로만 작성되었습니다.",
    attribution: "정하늘 작성 | 데이터 출처: WHO, CDC, 공개 데이터셋",
};

// ═══════════════════════════════════════════════════════════
// Variant
// ═══════════════════════════════════════════════════════════

/// The two reports produced per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportVariant {
    /// Plain-language English explanation for the patient.
    PatientFacingEnglish,
    /// Korean translation of the explanation, for the treating clinician.
    TranslatedKorean,
}

impl ReportVariant {
    pub fn all() -> &'static [ReportVariant] {
        &[Self::PatientFacingEnglish, Self::TranslatedKorean]
    }

    pub fn template(&self) -> &'static ReportTemplate {
        match self {
            Self::PatientFacingEnglish => &ENGLISH_TEMPLATE,
            Self::TranslatedKorean => &KOREAN_TEMPLATE,
        }
    }

    /// Font family name resolved through the font provider.
    pub fn font_family(&self) -> &'static str {
        match self {
            Self::PatientFacingEnglish => "DejaVu",
            Self::TranslatedKorean => "NotoSansKR",
        }
    }

    /// BCP 47 language tag of the template and body.
    pub fn language(&self) -> &'static str {
        match self {
            Self::PatientFacingEnglish => "en",
            Self::TranslatedKorean => "ko",
        }
    }

    /// Point size of the title line. The Korean face runs larger, so its
    /// title is set smaller.
    pub fn title_size(&self) -> f32 {
        match self {
            Self::PatientFacingEnglish => 14.0,
            Self::TranslatedKorean => 12.0,
        }
    }

    /// Subheading shown above the body in the browser.
    pub fn screen_heading(&self) -> &'static str {
        match self {
            Self::PatientFacingEnglish => "Patient-Friendly Explanation",
            Self::TranslatedKorean => "환자 친화적 설명",
        }
    }

    /// Suggested name for the downloaded PDF.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::PatientFacingEnglish => "patient_report_eng.pdf",
            Self::TranslatedKorean => "patient_report_kor.pdf",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientFacingEnglish => "patient_facing_english",
            Self::TranslatedKorean => "translated_korean",
        }
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
