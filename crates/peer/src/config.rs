//! Configuration loading and validation for the reference peer.
//!
//! All values are read from environment variables at startup.

use anyhow::{Context, Result};
use serde::Deserialize;

/// RSA modulus sizes the peer will generate.
pub const SUPPORTED_KEY_BITS: [usize; 3] = [2048, 3072, 4096];

/// Validated peer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Modulus size of the RSA key pair generated at startup.
    #[serde(default = "default_rsa_key_bits")]
    pub rsa_key_bits: usize,

    /// PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`) PEM file to load
    /// the RSA private key from instead of generating one.
    #[serde(default)]
    pub rsa_private_key_path: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_rsa_key_bits() -> usize {
    2048
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            rsa_key_bits: default_rsa_key_bits(),
            rsa_private_key_path: None,
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
            .context("failed to build peer configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise peer configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if !SUPPORTED_KEY_BITS.contains(&self.rsa_key_bits) {
            anyhow::bail!(
                "RSA_KEY_BITS must be one of {SUPPORTED_KEY_BITS:?}, got {}",
                self.rsa_key_bits
            );
        }
        if let Some(path) = &self.rsa_private_key_path {
            if path.trim().is_empty() {
                anyhow::bail!("RSA_PRIVATE_KEY_PATH must not be empty when set");
            }
        }
        Ok(())
    }
}
