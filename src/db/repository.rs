//! Repository functions for intakes, vitals and clinical summaries.
//!
//! All writes assume at-most-one in-flight mutation per intake — callers hold
//! one connection per request and SQLite serializes the rest.

use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{
    ClinicalSummary, DoctorStatus, IntakeRecord, NewIntake, NewVitals, PriorityLevel,
    VitalsEntry, WorkflowStatus,
};

/// Timestamp format used for every stored datetime.
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to the storage format.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    // Round-trip through the storage format to drop sub-second precision.
    NaiveDateTime::parse_from_str(&now.format(TIMESTAMP_FMT).to_string(), TIMESTAMP_FMT)
        .unwrap_or(now)
}

fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

// ═══════════════════════════════════════════════════════════
// Intakes
// ═══════════════════════════════════════════════════════════

/// Insert a new patient intake. Returns the generated UUID.
pub fn insert_intake(conn: &Connection, intake: &NewIntake) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO patient_intakes (id, full_name, age, sex, address,
         chief_complaint, symptoms, duration, severity, history, medications,
         allergies, workflow_status, doctor_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            id.to_string(),
            intake.full_name,
            intake.age as i64,
            intake.sex,
            intake.address,
            intake.chief_complaint,
            intake.symptoms,
            intake.duration,
            intake.severity,
            intake.history,
            intake.medications,
            intake.allergies,
            WorkflowStatus::PendingNurse.as_str(),
            DoctorStatus::Pending.as_str(),
            fmt_ts(now_timestamp()),
        ],
    )?;
    Ok(id)
}

/// Fetch one intake by id.
pub fn get_intake(conn: &Connection, intake_id: Uuid) -> Result<IntakeRecord, DatabaseError> {
    conn.query_row(
        "SELECT id, full_name, age, sex, address, chief_complaint, symptoms,
                duration, severity, history, medications, allergies,
                workflow_status, doctor_status, doctor_status_updated_at, created_at
         FROM patient_intakes WHERE id = ?1",
        params![intake_id.to_string()],
        intake_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "intake".into(),
            id: intake_id.to_string(),
        },
        other => other.into(),
    })
}

/// All intakes, newest first.
pub fn list_intakes(conn: &Connection) -> Result<Vec<IntakeRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, age, sex, address, chief_complaint, symptoms,
                duration, severity, history, medications, allergies,
                workflow_status, doctor_status, doctor_status_updated_at, created_at
         FROM patient_intakes ORDER BY created_at DESC, id",
    )?;
    let rows = stmt.query_map([], intake_from_row)?;
    let mut intakes = Vec::new();
    for row in rows {
        intakes.push(row?);
    }
    Ok(intakes)
}

fn intake_from_row(row: &Row<'_>) -> rusqlite::Result<IntakeRecord> {
    Ok(IntakeRecord {
        id: parse_uuid(row, 0)?,
        full_name: row.get(1)?,
        age: row.get(2)?,
        sex: row.get(3)?,
        address: row.get(4)?,
        chief_complaint: row.get(5)?,
        symptoms: row.get(6)?,
        duration: row.get(7)?,
        severity: row.get(8)?,
        history: row.get(9)?,
        medications: row.get(10)?,
        allergies: row.get(11)?,
        workflow_status: parse_enum(row, 12, WorkflowStatus::from_str)?,
        doctor_status: parse_enum(row, 13, DoctorStatus::from_str)?,
        doctor_status_updated_at: row.get(14)?,
        created_at: row.get(15)?,
    })
}

// ═══════════════════════════════════════════════════════════
// Vitals
// ═══════════════════════════════════════════════════════════

/// Fetch the vitals entry for an intake, if one has been recorded.
pub fn get_vitals(
    conn: &Connection,
    intake_id: Uuid,
) -> Result<Option<VitalsEntry>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, intake_id, heart_rate, respiratory_rate, temperature_c,
                spo2, systolic_bp, diastolic_bp, created_at
         FROM vitals_entries WHERE intake_id = ?1",
        params![intake_id.to_string()],
        vitals_from_row,
    );
    match result {
        Ok(vitals) => Ok(Some(vitals)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Record vitals for an intake. An existing entry is superseded — deleted
/// and replaced, never merged. Returns the stored row.
pub fn replace_vitals(
    conn: &Connection,
    intake_id: Uuid,
    vitals: &NewVitals,
) -> Result<VitalsEntry, DatabaseError> {
    // Surface a missing intake as NotFound rather than an FK violation.
    get_intake(conn, intake_id)?;

    conn.execute(
        "DELETE FROM vitals_entries WHERE intake_id = ?1",
        params![intake_id.to_string()],
    )?;

    let id = Uuid::new_v4();
    let created_at = now_timestamp();
    conn.execute(
        "INSERT INTO vitals_entries (id, intake_id, heart_rate, respiratory_rate,
         temperature_c, spo2, systolic_bp, diastolic_bp, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id.to_string(),
            intake_id.to_string(),
            vitals.heart_rate as i64,
            vitals.respiratory_rate as i64,
            vitals.temperature_c,
            vitals.spo2 as i64,
            vitals.systolic_bp as i64,
            vitals.diastolic_bp as i64,
            fmt_ts(created_at),
        ],
    )?;

    Ok(VitalsEntry {
        id,
        intake_id,
        heart_rate: vitals.heart_rate,
        respiratory_rate: vitals.respiratory_rate,
        temperature_c: vitals.temperature_c,
        spo2: vitals.spo2,
        systolic_bp: vitals.systolic_bp,
        diastolic_bp: vitals.diastolic_bp,
        created_at,
    })
}

fn vitals_from_row(row: &Row<'_>) -> rusqlite::Result<VitalsEntry> {
    Ok(VitalsEntry {
        id: parse_uuid(row, 0)?,
        intake_id: parse_uuid(row, 1)?,
        heart_rate: row.get(2)?,
        respiratory_rate: row.get(3)?,
        temperature_c: row.get(4)?,
        spo2: row.get(5)?,
        systolic_bp: row.get(6)?,
        diastolic_bp: row.get(7)?,
        created_at: row.get(8)?,
    })
}

// ═══════════════════════════════════════════════════════════
// Clinical summaries
// ═══════════════════════════════════════════════════════════

/// Fetch the clinical summary for an intake, if one has been generated.
pub fn get_summary(
    conn: &Connection,
    intake_id: Uuid,
) -> Result<Option<ClinicalSummary>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, intake_id, short_summary, priority_level, red_flags,
                differential, recommended_questions, recommended_next_steps,
                doctor_note, decision, created_at
         FROM clinical_summaries WHERE intake_id = ?1",
        params![intake_id.to_string()],
        summary_from_row,
    );
    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Store a clinical summary, replacing any existing one for the same intake.
pub fn replace_summary(
    conn: &Connection,
    summary: &ClinicalSummary,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM clinical_summaries WHERE intake_id = ?1",
        params![summary.intake_id.to_string()],
    )?;
    conn.execute(
        "INSERT INTO clinical_summaries (id, intake_id, short_summary,
         priority_level, red_flags, differential, recommended_questions,
         recommended_next_steps, doctor_note, decision, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            summary.id.to_string(),
            summary.intake_id.to_string(),
            summary.short_summary,
            summary.priority_level.as_str(),
            summary.red_flags,
            summary.differential,
            summary.recommended_questions,
            summary.recommended_next_steps,
            summary.doctor_note,
            summary.decision.as_str(),
            fmt_ts(summary.created_at),
        ],
    )?;
    Ok(())
}

/// Delete the clinical summary for an intake (no-op if none exists).
pub fn delete_summary(conn: &Connection, intake_id: Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM clinical_summaries WHERE intake_id = ?1",
        params![intake_id.to_string()],
    )?;
    Ok(())
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ClinicalSummary> {
    Ok(ClinicalSummary {
        id: parse_uuid(row, 0)?,
        intake_id: parse_uuid(row, 1)?,
        short_summary: row.get(2)?,
        priority_level: parse_enum(row, 3, PriorityLevel::from_str)?,
        red_flags: row.get(4)?,
        differential: row.get(5)?,
        recommended_questions: row.get(6)?,
        recommended_next_steps: row.get(7)?,
        doctor_note: row.get(8)?,
        decision: parse_enum(row, 9, DoctorStatus::from_str)?,
        created_at: row.get(10)?,
    })
}

// ═══════════════════════════════════════════════════════════
// Workflow updates
// ═══════════════════════════════════════════════════════════

/// Set the derived coarse workflow stage on an intake.
pub fn set_workflow_status(
    conn: &Connection,
    intake_id: Uuid,
    status: WorkflowStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patient_intakes SET workflow_status = ?2 WHERE id = ?1",
        params![intake_id.to_string(), status.as_str()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "intake".into(),
            id: intake_id.to_string(),
        });
    }
    Ok(())
}

/// Persist a successful doctor decision: doctor_status + change timestamp +
/// derived workflow_status on the intake, decision + note on the summary.
/// One transaction — a decision is never half-recorded.
pub fn record_decision(
    conn: &mut Connection,
    intake_id: Uuid,
    decision: DoctorStatus,
    doctor_note: &str,
    workflow_status: WorkflowStatus,
    decided_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE patient_intakes
         SET doctor_status = ?2, doctor_status_updated_at = ?3, workflow_status = ?4
         WHERE id = ?1",
        params![
            intake_id.to_string(),
            decision.as_str(),
            fmt_ts(decided_at),
            workflow_status.as_str(),
        ],
    )?;
    tx.execute(
        "UPDATE clinical_summaries SET decision = ?2, doctor_note = ?3
         WHERE intake_id = ?1",
        params![intake_id.to_string(), decision.as_str(), doctor_note],
    )?;
    tx.commit()?;
    Ok(())
}

// ── Row helpers ─────────────────────────────────────────────

fn parse_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_enum<T>(
    row: &Row<'_>,
    idx: usize,
    parse: impl Fn(&str) -> Result<T, DatabaseError>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
