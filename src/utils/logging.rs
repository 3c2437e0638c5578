// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter: our own progress at INFO, dependencies only when they warn.
const DEFAULT_FILTER: &str = "warn,factsheet_extractor=info";

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable and
/// falls back to [`DEFAULT_FILTER`] so PDF parser chatter stays quiet.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete.");
}
