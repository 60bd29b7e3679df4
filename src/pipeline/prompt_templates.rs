//! Prompt templates and the sample-note catalogue.
//!
//! Model output is treated as opaque prose, so these strings are the only
//! lever on what the sanitizer and composer receive.

use serde::Serialize;

use crate::inference::ChatMessage;
use crate::sanitize::SanitizedText;

// ═══════════════════════════════════════════════════════════
// Explanation
// ═══════════════════════════════════════════════════════════

const EXPLANATION_INSTRUCTIONS: &str = "\
Based on the following Korean doctor's note, provide a patient-friendly English explanation for the foreign patient.

Requirements:
- Explain medical terms clearly in simple language.
- Describe why each treatment or medication is suggested.
- Highlight potential risks related to the patient's conditions that are not immediately obvious.
- Include practical, actionable daily tips and lifestyle guidance tailored to this patient's conditions, lab results, and age that the patient might not already know
- Explanations of why certain treatments or lifestyle changes are recommended.
- Must reference public health data from WHO or CDC or open data once.
- Keep the tone clear, concise, and patient-focused, suitable for direct display in a PDF.";

/// User prompt asking for the patient-facing English explanation.
pub fn explanation_prompt(note: &str) -> String {
    format!("{EXPLANATION_INSTRUCTIONS}\n\nPatient note: {note}")
}

pub fn explanation_messages(note: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(explanation_prompt(note))]
}

// ═══════════════════════════════════════════════════════════
// Translation
// ═══════════════════════════════════════════════════════════

/// User prompt asking for a Korean rendering of the sanitized explanation.
pub fn translation_prompt(explanation: &SanitizedText) -> String {
    format!(
        "Translate the following doctor's note to Korean:\n\n{explanation}. \
         aware that the patient is one person not people."
    )
}

pub fn translation_messages(explanation: &SanitizedText) -> Vec<ChatMessage> {
    vec![ChatMessage::user(translation_prompt(explanation))]
}

// ═══════════════════════════════════════════════════════════
// Follow-up questions
// ═══════════════════════════════════════════════════════════

pub const FOLLOW_UP_SYSTEM: &str = "You are a helpful medical explainer for patients.";

/// Conversation for a follow-up question: persona, the original note, then
/// the question.
pub fn follow_up_messages(note: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(FOLLOW_UP_SYSTEM),
        ChatMessage::user(format!("Doctor's note: {note}")),
        ChatMessage::user(format!("Patient question: {question}")),
    ]
}

// ═══════════════════════════════════════════════════════════
// Sample notes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleNote {
    pub label: &'static str,
    pub note: &'static str,
}

/// Example notes offered in the UI selector.
pub const SAMPLE_NOTES: &[SampleNote] = &[
    SampleNote {
        label: "고혈압 & 고지혈증",
        note: "45세 남성, 고혈압(2기) 및 고지혈증 진단. 아토르바스타틴 20mg 처방 예정.",
    },
    SampleNote {
        label: "당뇨병 & 비만",
        note: "52세 여성, 제2형 당뇨병 (HbA1C 8.2%), BMI 32. 메트포르민 복용 중, 생활습관 개선 권장.",
    },
    SampleNote {
        label: "천식 악화",
        note: "30세 환자, 호흡곤란 및 쌕쌕거림으로 내원. 흡입용 스테로이드 처방.",
    },
    SampleNote {
        label: "만성신질환 & 고혈압",
        note: "60세 여성, CKD 3단계 (eGFR 42). 아몰로디핀 복용 중. 저염식 및 신장내과 추적 관찰 필요.",
    },
    SampleNote {
        label: "심부전 & 부정맥",
        note: "70세 남성, 심부전 EF 35%. 이뇨제 및 베타차단제 복용 중. 간헐적 심실 조기수축 관찰.",
    },
];
