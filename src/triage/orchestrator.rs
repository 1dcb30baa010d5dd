//! Vitals submission flow: validate, supersede, summarize, persist.
//!
//! This is the nurse-side entry point. It always leaves the intake in a
//! consistent shape: vitals recorded, exactly one clinical summary derived
//! from them, workflow stage PENDING_DOCTOR.

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use super::summarizer::Summarizer;
use super::types::Oracle;
use crate::db::{self, DatabaseError};
use crate::models::{
    join_lines, ClinicalSummary, DoctorStatus, NewVitals, VitalsValidationError, WorkflowStatus,
};

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] VitalsValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Record a vitals reading for an intake and (re)generate its clinical
/// summary. Existing vitals and summary are superseded, never merged.
pub fn process_vitals_submission<O: Oracle>(
    conn: &Connection,
    summarizer: &Summarizer<O>,
    intake_id: Uuid,
    vitals: &NewVitals,
) -> Result<ClinicalSummary, SubmissionError> {
    vitals.validate()?;

    let intake = db::get_intake(conn, intake_id)?;

    db::replace_vitals(conn, intake_id, vitals)?;
    // The old summary no longer matches any stored vitals; drop it before
    // the oracle call so a crash cannot leave a stale pairing behind.
    db::delete_summary(conn, intake_id)?;

    let draft = summarizer.generate(&intake, vitals);

    let summary = ClinicalSummary {
        id: Uuid::new_v4(),
        intake_id,
        short_summary: draft.short_summary,
        priority_level: draft.priority_level,
        red_flags: join_lines(&draft.red_flags),
        differential: join_lines(&draft.differential_considerations),
        recommended_questions: join_lines(&draft.recommended_questions),
        recommended_next_steps: join_lines(&draft.recommended_next_steps),
        doctor_note: String::new(),
        decision: DoctorStatus::Pending,
        created_at: db::now_timestamp(),
    };
    db::replace_summary(conn, &summary)?;
    db::set_workflow_status(conn, intake_id, WorkflowStatus::PendingDoctor)?;

    tracing::info!(
        intake_id = %intake_id,
        priority = %summary.priority_level,
        red_flags = summary.red_flags_list().len(),
        "Clinical summary stored"
    );

    Ok(summary)
}
