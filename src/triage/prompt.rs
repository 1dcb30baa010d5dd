//! Structured prompt for the clinical summary oracle.
//!
//! The model is instructed to answer with strict JSON only; the parser
//! enforces that contract, the prompt just makes compliance likely.

use crate::models::{IntakeRecord, NewVitals};

/// System instruction sent with every summary request.
pub const SYSTEM_PROMPT: &str = "You are a clinical decision-support assistant. \
You do NOT diagnose. You assist clinicians by summarizing structured intake data. \
Respond with strict JSON only, no markdown.";

/// Literal used for optional intake fields the patient left blank.
pub const NONE_REPORTED: &str = "None reported";

/// Render an optional free-text field, normalizing blanks.
pub fn field_or_none(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NONE_REPORTED
    } else {
        trimmed
    }
}

/// Build the generation prompt from one intake and its vitals reading.
pub fn build_prompt(intake: &IntakeRecord, vitals: &NewVitals) -> String {
    format!(
        r#"Return STRICT JSON with the following format:

{{
  "short_summary": string,
  "priority_level": "LOW" | "MED" | "HIGH",
  "red_flags": [string],
  "differential_considerations": [string],
  "recommended_questions": [string],
  "recommended_next_steps": [string]
}}

PATIENT DATA:
Name: {name}
Age: {age}
Sex: {sex}
Chief Complaint: {complaint}
Symptoms: {symptoms}
Duration: {duration}
Severity: {severity}
History: {history}
Medications: {medications}
Allergies: {allergies}

VITALS:
{vitals}

Important:
- Escalate to HIGH priority if vitals are critically abnormal.
- Be concise.
- No markdown.
- Return ONLY JSON.
"#,
        name = intake.full_name,
        age = intake.age,
        sex = intake.sex,
        complaint = field_or_none(&intake.chief_complaint),
        symptoms = field_or_none(&intake.symptoms),
        duration = field_or_none(&intake.duration),
        severity = field_or_none(&intake.severity),
        history = field_or_none(&intake.history),
        medications = field_or_none(&intake.medications),
        allergies = field_or_none(&intake.allergies),
        vitals = vitals.render(),
    )
}
