//! HTTP client for the summary oracle (Ollama-compatible generate API),
//! plus a scripted mock for tests.

use serde::{Deserialize, Serialize};

use super::types::Oracle;
use super::TriageError;
use crate::config;

/// Blocking HTTP oracle client.
pub struct OracleClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OracleClient {
    /// Create a client pointing at the given endpoint.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client configured from the environment (`CLINIPILOT_ORACLE_URL`),
    /// falling back to the local default endpoint.
    pub fn from_env() -> Self {
        Self::new(&config::oracle_url(), config::ORACLE_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for the oracle /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from the oracle /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Oracle for OracleClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, TriageError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest { model, prompt, system, stream: false };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                TriageError::OracleConnection(self.base_url.clone())
            } else if e.is_timeout() {
                TriageError::OracleTimeout(self.timeout_secs)
            } else {
                TriageError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            // 503 is the transport's "busy, come back shortly" — the
            // summarizer retries it exactly once.
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(TriageError::OracleUnavailable { status: status.as_u16(), body });
            }
            return Err(TriageError::OracleError { status: status.as_u16(), body });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Scripted oracle for tests — replays a queue of canned results, one per
/// call. An exhausted script answers as unreachable.
pub struct MockOracle {
    script: std::sync::Mutex<std::collections::VecDeque<Result<String, TriageError>>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockOracle {
    /// Oracle that answers every call with the same reply.
    pub fn replying(response: &str) -> Self {
        Self::with_script((0..8).map(|_| Ok(response.to_string())).collect())
    }

    /// Oracle that fails every call as unreachable.
    pub fn unreachable() -> Self {
        Self::with_script(vec![])
    }

    /// Oracle that replays the given results in order.
    pub fn with_script(script: Vec<Result<String, TriageError>>) -> Self {
        Self {
            script: std::sync::Mutex::new(script.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// How many generate calls were made.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Oracle for MockOracle {
    fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, TriageError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.script
            .lock()
            .expect("mock script lock")
            .pop_front()
            .unwrap_or_else(|| Err(TriageError::OracleConnection("mock".into())))
    }
}
