//! Intake lifecycle and the doctor decision state machine.
//!
//! Two layers of state:
//! - `doctor_status` — the decision sub-state (PENDING / DELAYED / ADMITTED /
//!   APPROVED), moved only through the transition table in `state_machine`.
//! - `workflow_status` — the coarse stage (PENDING_NURSE / PENDING_DOCTOR /
//!   COMPLETED), always derived from what exists on the intake plus the
//!   decision. It is never written independently.

pub mod decision;
pub mod state_machine;

pub use decision::*;
pub use state_machine::*;

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{DoctorStatus, WorkflowStatus};

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Decision attempted before the nurse recorded vitals. Client "not
    /// ready", distinct from a transition conflict.
    #[error("intake {0} has no recorded vitals")]
    MissingVitals(Uuid),

    /// Decision attempted before a clinical summary was generated.
    #[error("intake {0} has no clinical summary")]
    MissingSummary(Uuid),

    /// The requested decision is not reachable from the current state.
    /// Client "already decided incompatibly".
    #[error("illegal decision transition: {from} -> {requested}")]
    IllegalTransition {
        from: DoctorStatus,
        requested: DoctorStatus,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl WorkflowError {
    /// "Not ready" errors — vitals or summary missing.
    pub fn is_precondition(&self) -> bool {
        matches!(self, WorkflowError::MissingVitals(_) | WorkflowError::MissingSummary(_))
    }

    /// Transition-table rejections.
    pub fn is_conflict(&self) -> bool {
        matches!(self, WorkflowError::IllegalTransition { .. })
    }
}

/// The coarse stage as a function of what the intake has accumulated.
/// Single source of truth — every write of `workflow_status` goes through
/// this derivation.
pub fn derive_workflow_status(
    has_vitals: bool,
    has_summary: bool,
    doctor_status: DoctorStatus,
) -> WorkflowStatus {
    if !has_vitals {
        return WorkflowStatus::PendingNurse;
    }
    if has_summary && doctor_status != DoctorStatus::Pending {
        return WorkflowStatus::Completed;
    }
    WorkflowStatus::PendingDoctor
}
