//! Telemetry initialisation for the client.
//!
//! Logs go to stderr as JSON so that stdout carries only the round-trip
//! report. Plaintext, keys, and ciphertext are never logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber. `RUST_LOG` wins over `log_level` when
/// set.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise client tracing subscriber: {e}"))
}
