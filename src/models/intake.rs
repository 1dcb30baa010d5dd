use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DoctorStatus, WorkflowStatus};

/// Intake fields as submitted by the patient. Everything beyond the
/// demographics and the complaint is optional free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIntake {
    pub full_name: String,
    pub age: u8,
    pub sex: String,
    pub address: String,
    pub chief_complaint: String,
    pub symptoms: String,
    pub duration: String,  // e.g. "2 days"
    pub severity: String,  // e.g. "7/10"
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub medications: String,
    #[serde(default)]
    pub allergies: String,
}

/// One patient's case record, from submission through doctor decision.
///
/// Owns zero-or-one vitals entry and zero-or-one clinical summary (enforced
/// by UNIQUE intake_id in storage). `workflow_status` is always derived from
/// what exists plus `doctor_status` — it is never written independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub id: Uuid,
    pub full_name: String,
    pub age: u8,
    pub sex: String,
    pub address: String,
    pub chief_complaint: String,
    pub symptoms: String,
    pub duration: String,
    pub severity: String,
    pub history: String,
    pub medications: String,
    pub allergies: String,
    pub workflow_status: WorkflowStatus,
    pub doctor_status: DoctorStatus,
    pub doctor_status_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl NewIntake {
    /// True when the complaint narrative is present (intake forms may arrive
    /// with optional fields blank).
    pub fn has_complaint(&self) -> bool {
        !self.chief_complaint.trim().is_empty() || !self.symptoms.trim().is_empty()
    }
}
