pub mod config;
pub mod models;
pub mod db;
pub mod triage; // rule engine + oracle adapter + summary generation
pub mod workflow; // intake lifecycle + doctor decision state machine

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses embedding this
/// crate. Library code only emits events; it never installs a subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Clinipilot core v{}", config::APP_VERSION);
}
