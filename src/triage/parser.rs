//! Schema validation for the oracle's reply.
//!
//! The external model is untrusted: the reply is treated as an arbitrary
//! JSON value and checked key by key before a typed draft is built. Anything
//! short of full compliance is an error — the summarizer falls back on it.

use std::str::FromStr;

use serde_json::Value;

use super::types::SummaryDraft;
use super::TriageError;
use crate::models::PriorityLevel;

const LIST_KEYS: &[&str] = &[
    "red_flags",
    "differential_considerations",
    "recommended_questions",
    "recommended_next_steps",
];

/// Parse and validate one raw oracle reply into a summary draft.
pub fn parse_summary_draft(raw: &str) -> Result<SummaryDraft, TriageError> {
    let json_str = strip_code_fences(raw);

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| TriageError::JsonParsing(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| TriageError::MalformedResponse("top level is not an object".into()))?;

    let short_summary = require_string(object, "short_summary")?;

    let priority_raw = require_string(object, "priority_level")?;
    let priority_level = PriorityLevel::from_str(&priority_raw)
        .map_err(|_| TriageError::WrongFieldType("priority_level"))?;

    Ok(SummaryDraft {
        short_summary,
        priority_level,
        red_flags: require_string_list(object, LIST_KEYS[0])?,
        differential_considerations: require_string_list(object, LIST_KEYS[1])?,
        recommended_questions: require_string_list(object, LIST_KEYS[2])?,
        recommended_next_steps: require_string_list(object, LIST_KEYS[3])?,
    })
}

/// Models sometimes wrap JSON in a ```json fence despite instructions.
/// Take the fenced payload when present, the trimmed text otherwise.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[start + 3..];
    let after_tag = after_fence
        .strip_prefix("json")
        .unwrap_or(after_fence)
        .trim_start();
    match after_tag.find("```") {
        Some(end) => after_tag[..end].trim(),
        None => after_tag.trim(),
    }
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<String, TriageError> {
    let value = object.get(key).ok_or(TriageError::MissingKey(key))?;
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or(TriageError::WrongFieldType(key))
}

fn require_string_list(
    object: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Vec<String>, TriageError> {
    let value = object.get(key).ok_or(TriageError::MissingKey(key))?;
    let array = value.as_array().ok_or(TriageError::WrongFieldType(key))?;
    array
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .ok_or(TriageError::WrongFieldType(key))
        })
        .collect()
}
