//! Request and response bodies exchanged between the client and the peer.
//!
//! All types are serialised as JSON with camelCase field names.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Symmetric process endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /api/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// `cipher_b64|iv_b64` envelope.
    pub encrypted_data: String,
    /// The key string both sides normalize identically.
    pub key: String,
}

/// Successful response body for `POST /api/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    /// The peer's own `cipher_b64|iv_b64` envelope, under a fresh IV.
    pub processed_data: String,
}

// ---------------------------------------------------------------------------
// Asymmetric endpoints
// ---------------------------------------------------------------------------

/// Response body for `GET /api/rsa/public-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// SPKI PEM-encoded RSA public key.
    pub public_key: String,
}

/// Request body for `POST /api/rsa/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaProcessRequest {
    /// Base64 RSA-OAEP ciphertext.
    pub encrypted_data: String,
}

/// Successful response body for `POST /api/rsa/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaProcessResponse {
    /// Plaintext as decrypted by the peer.
    pub decrypted_data: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason, shown to the caller verbatim.
    pub error: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `"ok"` when the peer can serve requests.
    pub status: String,
    /// Modulus size of the peer's RSA key.
    pub key_bits: usize,
}
