//! Triage decision core.
//!
//! Two cooperating halves:
//! - `rules` — the deterministic safety net. Pure function from vitals +
//!   complaint text to a priority level and an ordered red-flag list.
//! - `oracle`/`parser`/`summarizer` — the generative enrichment path. The
//!   external model is untrusted; its reply is schema-checked and any failure
//!   silently falls back to the rule engine. A caller always gets a draft.

pub mod cache;
pub mod oracle;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod rules;
pub mod summarizer;
pub mod types;

pub use cache::*;
pub use oracle::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use rules::*;
pub use summarizer::*;
pub use types::*;

use thiserror::Error;

/// Failures on the generative path. None of these cross
/// `Summarizer::generate` — the fallback absorbs them all.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Oracle is not reachable at {0}")]
    OracleConnection(String),

    #[error("Oracle request timed out after {0}s")]
    OracleTimeout(u64),

    #[error("Oracle temporarily unavailable (status {status}): {body}")]
    OracleUnavailable { status: u16, body: String },

    #[error("Oracle returned error (status {status}): {body}")]
    OracleError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Oracle response missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Oracle response field {0} has the wrong type")]
    WrongFieldType(&'static str),
}

impl TriageError {
    /// Transient failures earn exactly one retry after a short delay.
    pub fn is_transient(&self) -> bool {
        matches!(self, TriageError::OracleUnavailable { .. })
    }
}
