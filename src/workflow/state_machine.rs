//! Legal-transition table for the doctor decision sub-state.
//!
//! APPROVED is terminal; reopening a decided case is unsupported. Whether a
//! released-after-admission patient should ever move back to DELAYED for
//! re-observation is an open product question — until it is answered the
//! table stays closed.

use crate::models::DoctorStatus;

use super::WorkflowError;

/// Every legal (from, to) pair. Same-state no-ops are legal everywhere so a
/// re-submitted identical decision stays idempotent.
const LEGAL_TRANSITIONS: &[(DoctorStatus, DoctorStatus)] = &[
    (DoctorStatus::Pending, DoctorStatus::Admitted),
    (DoctorStatus::Pending, DoctorStatus::Approved),
    (DoctorStatus::Pending, DoctorStatus::Delayed),
    (DoctorStatus::Delayed, DoctorStatus::Admitted),
    (DoctorStatus::Delayed, DoctorStatus::Approved),
    (DoctorStatus::Admitted, DoctorStatus::Approved),
];

/// Is `from -> to` permitted?
pub fn can_transition(from: DoctorStatus, to: DoctorStatus) -> bool {
    from == to || LEGAL_TRANSITIONS.contains(&(from, to))
}

/// Check a requested transition, returning the new state or a conflict.
pub fn transition(
    from: DoctorStatus,
    requested: DoctorStatus,
) -> Result<DoctorStatus, WorkflowError> {
    if can_transition(from, requested) {
        Ok(requested)
    } else {
        Err(WorkflowError::IllegalTransition { from, requested })
    }
}

/// All states reachable from `from` in one step (no-op included).
pub fn reachable_from(from: DoctorStatus) -> Vec<DoctorStatus> {
    [
        DoctorStatus::Pending,
        DoctorStatus::Delayed,
        DoctorStatus::Admitted,
        DoctorStatus::Approved,
    ]
    .into_iter()
    .filter(|&to| can_transition(from, to))
    .collect()
}
