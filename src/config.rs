use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinipilot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

/// Application data directory: ~/Clinipilot/ on all platforms.
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Clinipilot")
}

/// Path of the clinic database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

// ── Oracle configuration ────────────────────────────────────

/// Default generation endpoint (Ollama-compatible) on the clinic host.
pub const DEFAULT_ORACLE_URL: &str = "http://localhost:11434";

/// Default model tag used for clinical summaries.
pub const DEFAULT_ORACLE_MODEL: &str = "medgemma:4b";

/// Request timeout for one oracle call. On expiry the call counts as a
/// failure and the rule-based fallback takes over.
pub const ORACLE_TIMEOUT_SECS: u64 = 60;

/// Delay before the single retry on a transient "service unavailable".
pub const ORACLE_RETRY_DELAY_MS: u64 = 250;

/// Environment overrides for the oracle endpoint and model.
pub const ORACLE_URL_ENV: &str = "CLINIPILOT_ORACLE_URL";
pub const ORACLE_MODEL_ENV: &str = "CLINIPILOT_ORACLE_MODEL";

/// Generated drafts kept by the bounded summarizer cache.
pub const DRAFT_CACHE_CAPACITY: usize = 64;

/// Read the oracle base URL (env override or default).
pub fn oracle_url() -> String {
    std::env::var(ORACLE_URL_ENV).unwrap_or_else(|_| DEFAULT_ORACLE_URL.to_string())
}

/// Read the oracle model tag (env override or default).
pub fn oracle_model() -> String {
    std::env::var(ORACLE_MODEL_ENV).unwrap_or_else(|_| DEFAULT_ORACLE_MODEL.to_string())
}
