//! Summary generation: oracle attempt, single retry, rule-based fallback.
//!
//! `Summarizer::generate` never fails. Whatever the oracle does — refuses
//! the connection, times out, answers garbage — the caller receives a usable
//! draft, worst case the deterministic rule-engine summary.

use std::time::Duration;

use super::cache::{draft_cache_key, DraftCache};
use super::parser::parse_summary_draft;
use super::prompt::{build_prompt, field_or_none, SYSTEM_PROMPT};
use super::rules;
use super::types::{Oracle, SummaryDraft};
use super::TriageError;
use crate::config;
use crate::models::{IntakeRecord, NewVitals};

pub struct Summarizer<O: Oracle> {
    oracle: O,
    model: String,
    cache: DraftCache,
    retry_delay: Duration,
}

impl<O: Oracle> Summarizer<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            model: config::oracle_model(),
            cache: DraftCache::new(config::DRAFT_CACHE_CAPACITY),
            retry_delay: Duration::from_millis(config::ORACLE_RETRY_DELAY_MS),
        }
    }

    /// Override the retry backoff (tests exercise the retry path without
    /// paying the production delay).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Produce a clinical summary draft for one intake and vitals reading.
    /// Total: oracle failures are logged and absorbed by the fallback.
    pub fn generate(&self, intake: &IntakeRecord, vitals: &NewVitals) -> SummaryDraft {
        let prompt = build_prompt(intake, vitals);
        let cache_key = draft_cache_key(&self.model, &prompt);

        if let Some(draft) = self.cache.get(&cache_key) {
            tracing::debug!(intake_id = %intake.id, "Summary draft served from cache");
            return draft;
        }

        match self.call_oracle(&prompt) {
            Ok(draft) => {
                self.cache.insert(cache_key, draft.clone());
                draft
            }
            Err(e) => {
                tracing::warn!(intake_id = %intake.id, error = %e, "Oracle failed, using rule-based fallback");
                fallback_summary(intake, vitals)
            }
        }
    }

    /// One oracle call, with a single retry on a transient unavailability
    /// signal, then strict schema validation of the reply.
    fn call_oracle(&self, prompt: &str) -> Result<SummaryDraft, TriageError> {
        let raw = match self.oracle.generate(&self.model, prompt, SYSTEM_PROMPT) {
            Ok(raw) => raw,
            Err(e) if e.is_transient() => {
                tracing::debug!(error = %e, "Oracle busy, retrying once");
                std::thread::sleep(self.retry_delay);
                self.oracle.generate(&self.model, prompt, SYSTEM_PROMPT)?
            }
            Err(e) => return Err(e),
        };
        parse_summary_draft(&raw)
    }
}

/// Deterministic rule-based summary — the safety net of the safety net.
/// Pure assembly over `rules::evaluate`; it cannot fail.
pub fn fallback_summary(intake: &IntakeRecord, vitals: &NewVitals) -> SummaryDraft {
    let outcome = rules::evaluate(vitals, &intake.chief_complaint, &intake.symptoms);

    let short_summary = format!(
        "{name} ({age}, {sex}) presents with {complaint}. Symptoms: {symptoms}. \
         Duration: {duration}. Severity: {severity}. Vitals: {vitals}.",
        name = intake.full_name,
        age = intake.age,
        sex = intake.sex,
        complaint = field_or_none(&intake.chief_complaint),
        symptoms = field_or_none(&intake.symptoms),
        duration = field_or_none(&intake.duration),
        severity = field_or_none(&intake.severity),
        vitals = vitals.render(),
    );

    SummaryDraft {
        short_summary,
        priority_level: outcome.priority,
        red_flags: outcome.red_flags,
        differential_considerations: vec!["Further clinical evaluation required.".into()],
        recommended_questions: vec!["Expand review of systems.".into()],
        recommended_next_steps: vec!["Follow clinic triage protocol.".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorStatus, PriorityLevel, WorkflowStatus};
    use crate::triage::oracle::MockOracle;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn intake() -> IntakeRecord {
        IntakeRecord {
            id: Uuid::new_v4(),
            full_name: "Amara Osei".into(),
            age: 54,
            sex: "F".into(),
            address: "12 Harbor Lane".into(),
            chief_complaint: "Chest pain".into(),
            symptoms: "Chest tightness with mild shortness of breath".into(),
            duration: "2 hours".into(),
            severity: "6/10".into(),
            history: String::new(),
            medications: String::new(),
            allergies: String::new(),
            workflow_status: WorkflowStatus::PendingNurse,
            doctor_status: DoctorStatus::Pending,
            doctor_status_updated_at: None,
            created_at: NaiveDateTime::default(),
        }
    }

    fn reading() -> NewVitals {
        NewVitals {
            heart_rate: 118,
            respiratory_rate: 22,
            temperature_c: 37.9,
            spo2: 96,
            systolic_bp: 128,
            diastolic_bp: 84,
        }
    }

    fn compliant_reply() -> String {
        serde_json::json!({
            "short_summary": "54yo F, chest pain with tachycardia.",
            "priority_level": "HIGH",
            "red_flags": ["HR >= 110 bpm (tachycardia)"],
            "differential_considerations": ["ACS"],
            "recommended_questions": ["Radiation?"],
            "recommended_next_steps": ["ECG now"]
        })
        .to_string()
    }

    fn fast(oracle: MockOracle) -> Summarizer<MockOracle> {
        Summarizer::new(oracle).with_retry_delay(Duration::from_millis(1))
    }

    #[test]
    fn compliant_oracle_reply_passes_through() {
        let summarizer = fast(MockOracle::replying(&compliant_reply()));
        let draft = summarizer.generate(&intake(), &reading());
        assert_eq!(draft.short_summary, "54yo F, chest pain with tachycardia.");
        assert_eq!(draft.priority_level, PriorityLevel::High);
    }

    #[test]
    fn unreachable_oracle_falls_back_with_all_fields() {
        let summarizer = fast(MockOracle::unreachable());
        let draft = summarizer.generate(&intake(), &reading());

        // Priority must match a direct rule evaluation on the same inputs.
        let expected = rules::evaluate(
            &reading(),
            "Chest pain",
            "Chest tightness with mild shortness of breath",
        );
        assert_eq!(draft.priority_level, expected.priority);
        assert_eq!(draft.red_flags, expected.red_flags);
        assert!(!draft.short_summary.is_empty());
        assert!(!draft.differential_considerations.is_empty());
        assert!(!draft.recommended_questions.is_empty());
        assert!(!draft.recommended_next_steps.is_empty());
    }

    #[test]
    fn malformed_reply_falls_back() {
        let summarizer = fast(MockOracle::replying("I cannot answer in JSON, sorry."));
        let draft = summarizer.generate(&intake(), &reading());
        assert_eq!(draft.recommended_next_steps, vec!["Follow clinic triage protocol."]);
    }

    #[test]
    fn missing_key_falls_back() {
        let mut value: serde_json::Value = serde_json::from_str(&compliant_reply()).unwrap();
        value.as_object_mut().unwrap().remove("red_flags");
        let summarizer = fast(MockOracle::replying(&value.to_string()));
        let draft = summarizer.generate(&intake(), &reading());
        assert_eq!(draft.differential_considerations, vec!["Further clinical evaluation required."]);
    }

    #[test]
    fn transient_unavailability_retries_once_then_succeeds() {
        let oracle = MockOracle::with_script(vec![
            Err(TriageError::OracleUnavailable { status: 503, body: "busy".into() }),
            Ok(compliant_reply()),
        ]);
        let summarizer = fast(oracle);
        let draft = summarizer.generate(&intake(), &reading());
        assert_eq!(draft.priority_level, PriorityLevel::High);
        assert_eq!(summarizer.oracle.call_count(), 2);
    }

    #[test]
    fn repeated_unavailability_exhausts_retry_budget() {
        let oracle = MockOracle::with_script(vec![
            Err(TriageError::OracleUnavailable { status: 503, body: String::new() }),
            Err(TriageError::OracleUnavailable { status: 503, body: String::new() }),
        ]);
        let summarizer = fast(oracle);
        let draft = summarizer.generate(&intake(), &reading());
        // Exactly two calls, then fallback — no third attempt.
        assert_eq!(summarizer.oracle.call_count(), 2);
        assert_eq!(draft.recommended_questions, vec!["Expand review of systems."]);
    }

    #[test]
    fn timeout_is_not_retried() {
        let oracle = MockOracle::with_script(vec![Err(TriageError::OracleTimeout(60))]);
        let summarizer = fast(oracle);
        summarizer.generate(&intake(), &reading());
        assert_eq!(summarizer.oracle.call_count(), 1);
    }

    #[test]
    fn identical_submission_served_from_cache() {
        let summarizer = fast(MockOracle::replying(&compliant_reply()));
        let case = intake();
        let first = summarizer.generate(&case, &reading());
        let second = summarizer.generate(&case, &reading());
        assert_eq!(first, second);
        assert_eq!(summarizer.oracle.call_count(), 1);
    }

    #[test]
    fn fallback_drafts_are_not_cached() {
        // A later healthy oracle must not be shadowed by a cached fallback.
        let oracle = MockOracle::with_script(vec![
            Err(TriageError::OracleConnection("mock".into())),
            Ok(compliant_reply()),
        ]);
        let summarizer = fast(oracle);
        let case = intake();
        let first = summarizer.generate(&case, &reading());
        let second = summarizer.generate(&case, &reading());
        assert_eq!(first.recommended_next_steps, vec!["Follow clinic triage protocol."]);
        assert_eq!(second.short_summary, "54yo F, chest pain with tachycardia.");
    }

    #[test]
    fn fallback_summary_embeds_intake_narrative() {
        let draft = fallback_summary(&intake(), &reading());
        assert!(draft.short_summary.contains("Amara Osei"));
        assert!(draft.short_summary.contains("54"));
        assert!(draft.short_summary.contains("Chest pain"));
        assert!(draft.short_summary.contains("2 hours"));
        assert!(draft.short_summary.contains("6/10"));
        assert!(draft.short_summary.contains("HR 118 bpm"));
    }

    #[test]
    fn fallback_normalizes_blank_fields() {
        let mut case = intake();
        case.duration = String::new();
        case.severity = "  ".into();
        let draft = fallback_summary(&case, &reading());
        assert!(draft.short_summary.contains("Duration: None reported"));
        assert!(draft.short_summary.contains("Severity: None reported"));
    }
}
