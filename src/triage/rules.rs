//! Deterministic safety-net rules.
//!
//! `evaluate` is pure and total over validated vitals: no I/O, no failure
//! path. It runs on every vitals submission regardless of whether the oracle
//! succeeds, and it is the whole summary when the oracle does not.
//!
//! Check order is fixed (oxygen, heart rate, temperature, blood pressure,
//! respiratory rate, symptom keywords) and determines red-flag ordering.
//! Priority merging is monotone — a later rule can raise the level, never
//! lower it.

use serde::{Deserialize, Serialize};

use crate::models::{max_priority, NewVitals, PriorityLevel};

/// Outcome of one rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub priority: PriorityLevel,
    pub red_flags: Vec<String>,
}

/// Evaluate the red-flag rules against one vitals reading and the free-text
/// complaint. Keyword matching is case-insensitive over
/// `chief_complaint + " " + symptoms`.
pub fn evaluate(vitals: &NewVitals, chief_complaint: &str, symptoms: &str) -> RuleOutcome {
    let mut flags: Vec<String> = Vec::new();
    let mut priority = PriorityLevel::Low;

    let text = format!("{chief_complaint} {symptoms}").to_lowercase();

    // Oxygen risk
    if vitals.spo2 < 90 {
        flags.push("SpO2 < 90% (possible hypoxia)".into());
        priority = PriorityLevel::High;
    } else if vitals.spo2 < 94 {
        flags.push("SpO2 < 94% (monitor oxygenation)".into());
        priority = max_priority(priority, PriorityLevel::Med);
    }

    // Heart rate risk
    if vitals.heart_rate >= 130 {
        flags.push("HR >= 130 bpm (severe tachycardia)".into());
        priority = max_priority(priority, PriorityLevel::High);
    } else if vitals.heart_rate >= 110 {
        flags.push("HR >= 110 bpm (tachycardia)".into());
        priority = max_priority(priority, PriorityLevel::Med);
    }

    // Fever risk
    if vitals.temperature_c >= 40.0 {
        flags.push("Temp >= 40.0C (hyperpyrexia risk)".into());
        priority = max_priority(priority, PriorityLevel::High);
    } else if vitals.temperature_c >= 38.5 {
        flags.push("Temp >= 38.5C (fever)".into());
        priority = max_priority(priority, PriorityLevel::Med);
    }

    // Low blood pressure — shock overrides everything
    if vitals.systolic_bp < 90 {
        flags.push("SBP < 90 (possible hypotension/shock)".into());
        priority = PriorityLevel::High;
    }

    // Respiratory rate risk
    if vitals.respiratory_rate >= 30 {
        flags.push("RR >= 30 (respiratory distress risk)".into());
        priority = max_priority(priority, PriorityLevel::High);
    } else if vitals.respiratory_rate >= 21 {
        flags.push("RR >= 21 (tachypnea)".into());
        priority = max_priority(priority, PriorityLevel::Med);
    }

    // Symptom-based red flags
    if text.contains("chest") && (text.contains("pain") || text.contains("tight")) {
        if has_abnormal_vitals(vitals) {
            flags.push(
                "Chest pain with abnormal vitals (urgent cardiac evaluation recommended)".into(),
            );
            priority = max_priority(priority, PriorityLevel::High);
        } else {
            flags.push("Chest pain/tightness reported (cardiac risk screen recommended)".into());
            priority = max_priority(priority, PriorityLevel::Med);
        }
    }

    if text.contains("confusion") || text.contains("faint") || text.contains("passed out") {
        flags.push(
            "Altered mental status / fainting reported (urgent evaluation recommended)".into(),
        );
        priority = max_priority(priority, PriorityLevel::High);
    }

    RuleOutcome { priority, red_flags: flags }
}

/// Any vitals derangement that turns reported chest pain into an urgent
/// finding. Thresholds match the MED tiers of the individual checks.
fn has_abnormal_vitals(vitals: &NewVitals) -> bool {
    vitals.spo2 < 94
        || vitals.heart_rate >= 110
        || vitals.temperature_c >= 38.5
        || vitals.respiratory_rate >= 21
        || vitals.systolic_bp < 90
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(
        heart_rate: u16,
        respiratory_rate: u16,
        temperature_c: f64,
        spo2: u8,
        systolic_bp: u16,
    ) -> NewVitals {
        NewVitals {
            heart_rate,
            respiratory_rate,
            temperature_c,
            spo2,
            systolic_bp,
            diastolic_bp: 80,
        }
    }

    fn normal() -> NewVitals {
        vitals(72, 14, 36.8, 98, 120)
    }

    // ── Individual thresholds ──────────────────────────────────

    #[test]
    fn unremarkable_vitals_yield_low_and_no_flags() {
        let outcome = evaluate(&normal(), "Mild headache", "Started this morning");
        assert_eq!(outcome.priority, PriorityLevel::Low);
        assert!(outcome.red_flags.is_empty());
    }

    #[test]
    fn hypoxia_is_always_high() {
        for spo2 in [50, 70, 85, 89] {
            let outcome = evaluate(&vitals(72, 14, 36.8, spo2, 120), "", "");
            assert_eq!(outcome.priority, PriorityLevel::High, "spo2 {spo2}");
            assert_eq!(outcome.red_flags[0], "SpO2 < 90% (possible hypoxia)");
        }
    }

    #[test]
    fn borderline_oxygen_is_med() {
        let outcome = evaluate(&vitals(72, 14, 36.8, 92, 120), "", "");
        assert_eq!(outcome.priority, PriorityLevel::Med);
        assert_eq!(outcome.red_flags, vec!["SpO2 < 94% (monitor oxygenation)"]);
    }

    #[test]
    fn spo2_94_is_clean() {
        let outcome = evaluate(&vitals(72, 14, 36.8, 94, 120), "", "");
        assert!(outcome.red_flags.is_empty());
    }

    #[test]
    fn heart_rate_tiers() {
        let severe = evaluate(&vitals(130, 14, 36.8, 98, 120), "", "");
        assert_eq!(severe.priority, PriorityLevel::High);
        assert_eq!(severe.red_flags, vec!["HR >= 130 bpm (severe tachycardia)"]);

        let moderate = evaluate(&vitals(110, 14, 36.8, 98, 120), "", "");
        assert_eq!(moderate.priority, PriorityLevel::Med);
        assert_eq!(moderate.red_flags, vec!["HR >= 110 bpm (tachycardia)"]);

        let clean = evaluate(&vitals(109, 14, 36.8, 98, 120), "", "");
        assert!(clean.red_flags.is_empty());
    }

    #[test]
    fn temperature_tiers() {
        let hyper = evaluate(&vitals(72, 14, 40.0, 98, 120), "", "");
        assert_eq!(hyper.priority, PriorityLevel::High);
        assert_eq!(hyper.red_flags, vec!["Temp >= 40.0C (hyperpyrexia risk)"]);

        let fever = evaluate(&vitals(72, 14, 38.5, 98, 120), "", "");
        assert_eq!(fever.priority, PriorityLevel::Med);
        assert_eq!(fever.red_flags, vec!["Temp >= 38.5C (fever)"]);

        let warm = evaluate(&vitals(72, 14, 38.4, 98, 120), "", "");
        assert!(warm.red_flags.is_empty());
    }

    #[test]
    fn hypotension_is_always_high() {
        let outcome = evaluate(&vitals(72, 14, 36.8, 98, 89), "", "");
        assert_eq!(outcome.priority, PriorityLevel::High);
        assert_eq!(outcome.red_flags, vec!["SBP < 90 (possible hypotension/shock)"]);
    }

    #[test]
    fn respiratory_tiers() {
        let distress = evaluate(&vitals(72, 30, 36.8, 98, 120), "", "");
        assert_eq!(distress.priority, PriorityLevel::High);
        assert_eq!(distress.red_flags, vec!["RR >= 30 (respiratory distress risk)"]);

        let tachypnea = evaluate(&vitals(72, 21, 36.8, 98, 120), "", "");
        assert_eq!(tachypnea.priority, PriorityLevel::Med);
        assert_eq!(tachypnea.red_flags, vec!["RR >= 21 (tachypnea)"]);

        let clean = evaluate(&vitals(72, 20, 36.8, 98, 120), "", "");
        assert!(clean.red_flags.is_empty());
    }

    // ── Keyword rules ──────────────────────────────────────────

    #[test]
    fn chest_pain_with_normal_vitals_is_med() {
        let outcome = evaluate(&normal(), "Chest pain", "Dull ache since yesterday");
        assert_eq!(outcome.priority, PriorityLevel::Med);
        assert_eq!(
            outcome.red_flags,
            vec!["Chest pain/tightness reported (cardiac risk screen recommended)"]
        );
    }

    #[test]
    fn chest_tightness_matches_keyword_rule() {
        let outcome = evaluate(&normal(), "Discomfort", "Tightness across the chest");
        assert_eq!(outcome.priority, PriorityLevel::Med);
        assert_eq!(outcome.red_flags.len(), 1);
    }

    #[test]
    fn chest_keyword_is_case_insensitive() {
        let outcome = evaluate(&normal(), "CHEST PAIN", "");
        assert_eq!(outcome.priority, PriorityLevel::Med);
    }

    #[test]
    fn chest_pain_with_abnormal_vitals_is_high() {
        // HR 118 is in [110, 130): MED tachycardia on its own, but enough to
        // upgrade the chest-pain flag to the urgent variant.
        let reading = vitals(118, 22, 37.9, 96, 128);
        let outcome = evaluate(
            &reading,
            "Chest pain",
            "Chest tightness with mild shortness of breath",
        );
        assert!(outcome
            .red_flags
            .contains(&"HR >= 110 bpm (tachycardia)".to_string()));
        assert!(outcome.red_flags.contains(
            &"Chest pain with abnormal vitals (urgent cardiac evaluation recommended)"
                .to_string()
        ));
        assert_eq!(outcome.priority, PriorityLevel::High);
    }

    #[test]
    fn altered_mental_status_is_high() {
        for text in ["confusion since lunch", "feeling faint", "passed out twice"] {
            let outcome = evaluate(&normal(), "Unwell", text);
            assert_eq!(outcome.priority, PriorityLevel::High, "{text}");
            assert_eq!(
                outcome.red_flags,
                vec!["Altered mental status / fainting reported (urgent evaluation recommended)"]
            );
        }
    }

    // ── Ordering and monotonicity ──────────────────────────────

    #[test]
    fn flags_follow_fixed_detection_order() {
        // Everything fires: oxygen, HR, temp, BP, RR, chest keyword, syncope.
        let reading = vitals(135, 32, 40.2, 85, 85);
        let outcome = evaluate(&reading, "Chest pain", "fainting episodes");
        assert_eq!(
            outcome.red_flags,
            vec![
                "SpO2 < 90% (possible hypoxia)",
                "HR >= 130 bpm (severe tachycardia)",
                "Temp >= 40.0C (hyperpyrexia risk)",
                "SBP < 90 (possible hypotension/shock)",
                "RR >= 30 (respiratory distress risk)",
                "Chest pain with abnormal vitals (urgent cardiac evaluation recommended)",
                "Altered mental status / fainting reported (urgent evaluation recommended)",
            ]
        );
        assert_eq!(outcome.priority, PriorityLevel::High);
    }

    #[test]
    fn priority_never_downgrades_as_rules_accumulate() {
        // Hypoxia fires first (HIGH); later MED-tier findings must not lower it.
        let reading = vitals(112, 22, 38.6, 88, 120);
        let outcome = evaluate(&reading, "", "");
        assert_eq!(outcome.priority, PriorityLevel::High);
        assert_eq!(outcome.red_flags.len(), 4);
    }

    #[test]
    fn hypotension_override_on_top_of_existing_flags() {
        let outcome = evaluate(&vitals(72, 14, 36.8, 92, 85), "", "");
        assert_eq!(outcome.priority, PriorityLevel::High);
        assert_eq!(
            outcome.red_flags,
            vec![
                "SpO2 < 94% (monitor oxygenation)",
                "SBP < 90 (possible hypotension/shock)",
            ]
        );
    }

    #[test]
    fn low_iff_no_flags() {
        // Exhaustive-ish sweep over threshold edges: priority is LOW exactly
        // when the flag list is empty.
        let cases = [
            vitals(72, 14, 36.8, 98, 120),
            vitals(109, 20, 38.4, 94, 90),
            vitals(110, 14, 36.8, 98, 120),
            vitals(72, 21, 36.8, 98, 120),
            vitals(72, 14, 38.5, 98, 120),
            vitals(72, 14, 36.8, 93, 120),
            vitals(72, 14, 36.8, 98, 89),
        ];
        for reading in cases {
            let outcome = evaluate(&reading, "headache", "none");
            assert_eq!(
                outcome.priority == PriorityLevel::Low,
                outcome.red_flags.is_empty(),
                "{reading:?}"
            );
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let reading = vitals(118, 22, 37.9, 96, 128);
        let a = evaluate(&reading, "Chest pain", "tightness");
        let b = evaluate(&reading, "Chest pain", "tightness");
        assert_eq!(a, b);
    }
}
