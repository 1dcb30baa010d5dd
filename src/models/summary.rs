use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DoctorStatus, PriorityLevel};

/// The persisted clinical summary for one intake. List-shaped fields
/// (red flags, differential, questions, next steps) are stored newline-joined
/// and re-split on read; blank lines are dropped, order is preserved.
///
/// Exactly one summary exists per vitals submission — re-submitting vitals
/// deletes and recreates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalSummary {
    pub id: Uuid,
    pub intake_id: Uuid,
    pub short_summary: String,
    pub priority_level: PriorityLevel,
    pub red_flags: String,
    pub differential: String,
    pub recommended_questions: String,
    pub recommended_next_steps: String,
    pub doctor_note: String,
    pub decision: DoctorStatus,
    pub created_at: NaiveDateTime,
}

impl ClinicalSummary {
    pub fn red_flags_list(&self) -> Vec<String> {
        split_lines(&self.red_flags)
    }

    pub fn differential_list(&self) -> Vec<String> {
        split_lines(&self.differential)
    }

    pub fn recommended_questions_list(&self) -> Vec<String> {
        split_lines(&self.recommended_questions)
    }

    pub fn recommended_next_steps_list(&self) -> Vec<String> {
        split_lines(&self.recommended_next_steps)
    }
}

/// Flatten a list field for storage.
pub fn join_lines(items: &[String]) -> String {
    items.join("\n")
}

/// Re-split a stored list field. Blank and whitespace-only lines are
/// dropped; everything else comes back in stored order.
pub fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_then_split_round_trips_non_blank_lines() {
        let flags = vec![
            "SpO2 < 90% (possible hypoxia)".to_string(),
            "HR >= 110 bpm (tachycardia)".to_string(),
        ];
        assert_eq!(split_lines(&join_lines(&flags)), flags);
    }

    #[test]
    fn split_drops_blank_lines_preserving_order() {
        let stored = "first\n\n   \nsecond\nthird\n";
        assert_eq!(split_lines(stored), vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_field_splits_to_empty_list() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n\n").is_empty());
    }

    #[test]
    fn join_of_empty_list_is_empty() {
        assert_eq!(join_lines(&[]), "");
    }
}
