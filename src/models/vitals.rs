use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A measurement outside the accepted clinical range. Raised before any
/// triage logic runs — the rule engine only ever sees validated vitals.
#[derive(Error, Debug)]
#[error("{field} = {value} outside accepted range {min}..={max}")]
pub struct VitalsValidationError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Vitals as entered by the nurse, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVitals {
    pub heart_rate: u16,        // bpm
    pub respiratory_rate: u16,  // breaths/min
    pub temperature_c: f64,
    pub spo2: u8,               // oxygen saturation %
    pub systolic_bp: u16,       // mmHg
    pub diastolic_bp: u16,      // mmHg
}

impl NewVitals {
    /// Range-check every measurement. Accepted domains cover the extremes a
    /// live patient can present with; anything outside is a data-entry error.
    pub fn validate(&self) -> Result<(), VitalsValidationError> {
        check("heart_rate", self.heart_rate as f64, 30.0, 250.0)?;
        check("respiratory_rate", self.respiratory_rate as f64, 4.0, 60.0)?;
        check("temperature_c", self.temperature_c, 32.0, 43.0)?;
        check("spo2", self.spo2 as f64, 50.0, 100.0)?;
        check("systolic_bp", self.systolic_bp as f64, 50.0, 250.0)?;
        check("diastolic_bp", self.diastolic_bp as f64, 30.0, 150.0)?;
        Ok(())
    }

    /// One-line rendering for prompts and fallback summaries,
    /// e.g. "HR 118 bpm, RR 22/min, Temp 37.9C, SpO2 96%, BP 128/84".
    pub fn render(&self) -> String {
        format!(
            "HR {} bpm, RR {}/min, Temp {:.1}C, SpO2 {}%, BP {}/{}",
            self.heart_rate,
            self.respiratory_rate,
            self.temperature_c,
            self.spo2,
            self.systolic_bp,
            self.diastolic_bp,
        )
    }
}

fn check(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), VitalsValidationError> {
    if value < min || value > max {
        return Err(VitalsValidationError { field, value, min, max });
    }
    Ok(())
}

/// A persisted vitals row. Immutable once recorded — a re-submission
/// supersedes the whole row, it never merges into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsEntry {
    pub id: Uuid,
    pub intake_id: Uuid,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub temperature_c: f64,
    pub spo2: u8,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
    pub created_at: NaiveDateTime,
}

impl VitalsEntry {
    /// Measurements without row identity, as the rule engine and the
    /// oracle prompt consume them.
    pub fn reading(&self) -> NewVitals {
        NewVitals {
            heart_rate: self.heart_rate,
            respiratory_rate: self.respiratory_rate,
            temperature_c: self.temperature_c,
            spo2: self.spo2,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
        }
    }
}
