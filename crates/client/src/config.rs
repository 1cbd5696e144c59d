//! Configuration loading and validation for the round-trip client.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the peer, without the `/api` suffix.
    #[serde(default = "default_peer_base_url")]
    pub peer_base_url: String,

    /// Per-request timeout for every call to the peer.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_peer_base_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer_base_url: default_peer_base_url(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build client configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise client configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        let url = self.peer_base_url.trim();
        if url.is_empty() {
            anyhow::bail!("PEER_BASE_URL is required and must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("PEER_BASE_URL must start with http:// or https://");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}
