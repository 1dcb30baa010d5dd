//! Doctor decision handling: boundary normalization + apply_decision.
//!
//! Decision vocabulary accumulated across product iterations (ADMIT,
//! NOT_ADMIT, RELEASE, ...) is collapsed to the four-value enum here, at the
//! boundary. The transition table never sees a synonym.

use rusqlite::Connection;
use uuid::Uuid;

use super::state_machine;
use super::{derive_workflow_status, WorkflowError};
use crate::db;
use crate::models::{DoctorStatus, IntakeRecord};

/// Map a submitted decision string onto the internal enum. Matching is
/// case-insensitive after trimming; unrecognized input degrades to PENDING
/// (an unknown verb must never admit or release a patient).
pub fn normalize_decision(raw: &str) -> DoctorStatus {
    match raw.trim().to_uppercase().as_str() {
        "ADMIT" | "ADMITTED" => DoctorStatus::Admitted,
        "NOT_ADMIT" | "APPROVE" | "APPROVED" | "RELEASE" => DoctorStatus::Approved,
        "DELAY" | "DELAYED" => DoctorStatus::Delayed,
        "PENDING" => DoctorStatus::Pending,
        other => {
            tracing::warn!(decision = other, "Unrecognized decision string, treating as PENDING");
            DoctorStatus::Pending
        }
    }
}

/// Apply a doctor decision to an intake.
///
/// Preconditions are checked before the transition table: the intake must
/// have recorded vitals and a generated clinical summary. On success the
/// decision, its timestamp, the doctor note and the derived workflow stage
/// are persisted together; the updated intake is returned.
pub fn apply_decision(
    conn: &mut Connection,
    intake_id: Uuid,
    requested_decision: &str,
    doctor_note: &str,
) -> Result<IntakeRecord, WorkflowError> {
    let intake = db::get_intake(conn, intake_id)?;

    if db::get_vitals(conn, intake_id)?.is_none() {
        return Err(WorkflowError::MissingVitals(intake_id));
    }
    if db::get_summary(conn, intake_id)?.is_none() {
        return Err(WorkflowError::MissingSummary(intake_id));
    }

    let requested = normalize_decision(requested_decision);
    let next = state_machine::transition(intake.doctor_status, requested)?;

    let workflow_status = derive_workflow_status(true, true, next);
    let decided_at = db::now_timestamp();
    db::record_decision(conn, intake_id, next, doctor_note, workflow_status, decided_at)?;

    tracing::info!(
        intake_id = %intake_id,
        from = %intake.doctor_status,
        to = %next,
        stage = %workflow_status,
        "Doctor decision recorded"
    );

    db::get_intake(conn, intake_id).map_err(WorkflowError::from)
}
