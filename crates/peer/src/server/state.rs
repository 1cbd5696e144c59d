//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::keys::PeerKeyPair;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the key pair is behind an `Arc` and never mutated after
/// startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The peer's RSA key pair.
    pub keys: Arc<PeerKeyPair>,
}

impl AppState {
    /// Create a new [`AppState`] owning `keys`.
    pub fn new(keys: PeerKeyPair) -> Self {
        Self {
            keys: Arc::new(keys),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    let pem = include_str!("../../../../testdata/rsa2048_private.pem");
    AppState::new(PeerKeyPair::from_pem(pem).expect("fixture key parses"))
}
