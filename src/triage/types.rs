use serde::{Deserialize, Serialize};

use super::TriageError;
use crate::models::PriorityLevel;

/// A clinical summary draft, from the oracle or from the rule-based
/// fallback. Not yet persisted — the orchestrator turns it into a
/// `ClinicalSummary` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDraft {
    pub short_summary: String,
    pub priority_level: PriorityLevel,
    pub red_flags: Vec<String>,
    pub differential_considerations: Vec<String>,
    pub recommended_questions: Vec<String>,
    pub recommended_next_steps: Vec<String>,
}

/// One blocking generation call against the external model. Transport only:
/// retries and fallback are the summarizer's job, never the client's.
pub trait Oracle {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, TriageError>;
}
