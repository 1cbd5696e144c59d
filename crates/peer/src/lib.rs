//! Reference remote peer for the AES/RSA round-trip harness.
//!
//! Decrypts a symmetric envelope with the caller's key and returns it
//! re-encrypted under a fresh IV, serves its RSA public key, and decrypts
//! RSA-OAEP ciphertext sent by the client.

pub mod config;
pub mod error;
pub mod keys;
pub mod server;
pub mod telemetry;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use keys::PeerKeyPair;

/// Load the RSA key pair from `RSA_PRIVATE_KEY_PATH`, or generate one.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or generation fails.
pub fn load_key_pair(cfg: &Config) -> Result<PeerKeyPair> {
    match &cfg.rsa_private_key_path {
        Some(path) => {
            let pem = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read RSA private key from {path}"))?;
            let keys = PeerKeyPair::from_pem(&pem).context("failed to load RSA private key")?;
            info!(key_bits = keys.key_bits(), "RSA key pair loaded");
            Ok(keys)
        }
        None => {
            let keys = PeerKeyPair::generate(cfg.rsa_key_bits)
                .context("failed to generate RSA key pair")?;
            info!(key_bits = keys.key_bits(), "RSA key pair generated");
            Ok(keys)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_key_pair_from_path() {
        let cfg = Config {
            rsa_private_key_path: Some(
                concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/rsa2048_private.pem").into(),
            ),
            ..Config::default()
        };
        assert_eq!(load_key_pair(&cfg).unwrap().key_bits(), 2048);
    }

    #[test]
    fn missing_key_file_is_an_error() {
        let cfg = Config {
            rsa_private_key_path: Some("/nonexistent/key.pem".into()),
            ..Config::default()
        };
        assert!(load_key_pair(&cfg).is_err());
    }
}
