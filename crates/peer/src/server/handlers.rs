//! Axum request handlers for all peer endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use common::crypto::{AesGcmCipher, Envelope};
use common::protocol::{
    HealthResponse, ProcessRequest, ProcessResponse, PublicKeyResponse, RsaProcessRequest,
    RsaProcessResponse,
};
use tracing::{debug, info, warn};

use super::state::AppState;
use crate::error::ServiceError;

fn invalid_json(rejection: JsonRejection) -> ServiceError {
    debug!(error = %rejection, "rejected request body");
    ServiceError::BadRequest("Invalid JSON".into())
}

/// `POST /api/process`: decrypt the envelope with the supplied key and
/// return the same plaintext re-encrypted under a fresh IV.
pub async fn process(
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ServiceError> {
    let Json(req) = payload.map_err(invalid_json)?;

    let envelope = Envelope::decode(&req.encrypted_data)
        .map_err(|_| ServiceError::BadRequest("Invalid encrypted data format".into()))?;
    if req.key.is_empty() {
        return Err(ServiceError::BadRequest("Key is required".into()));
    }
    if envelope.cipher_b64.is_empty() || envelope.iv_b64.is_empty() {
        return Err(ServiceError::BadRequest("Cipher and IV are required".into()));
    }

    let cipher = AesGcmCipher::new(&req.key);
    let plaintext = cipher
        .decrypt(&envelope.cipher_b64, &envelope.iv_b64)
        .map_err(|e| {
            warn!(error = %e, "decryption failed");
            ServiceError::BadRequest(e.public_message())
        })?;

    let sealed = cipher.encrypt(&plaintext).map_err(|e| {
        warn!(error = %e, "re-encryption failed");
        ServiceError::EncryptionFailure("Re-encryption failed".into())
    })?;

    info!(plaintext_len = plaintext.len(), key_len = cipher.key_len(), "payload re-encrypted");
    Ok(Json(ProcessResponse {
        processed_data: Envelope::from(sealed).encode(),
    }))
}

/// `GET /api/rsa/public-key`: the SPKI PEM public key.
pub async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.keys.public_key_pem().to_owned(),
    })
}

/// `POST /api/rsa/process`: decrypt an RSA-OAEP ciphertext and echo the
/// plaintext.
pub async fn rsa_process(
    State(state): State<AppState>,
    payload: Result<Json<RsaProcessRequest>, JsonRejection>,
) -> Result<Json<RsaProcessResponse>, ServiceError> {
    let Json(req) = payload.map_err(invalid_json)?;
    if req.encrypted_data.is_empty() {
        return Err(ServiceError::BadRequest("Encrypted data is required".into()));
    }

    let decrypted = state.keys.decrypt_b64(&req.encrypted_data).map_err(|e| {
        warn!(error = %e, "RSA decryption failed");
        ServiceError::BadRequest("RSA decryption failed".into())
    })?;

    info!(plaintext_len = decrypted.len(), "RSA payload decrypted");
    Ok(Json(RsaProcessResponse {
        decrypted_data: decrypted,
    }))
}

/// `GET /health`: liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        key_bits: state.keys.key_bits(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> ServiceError {
    ServiceError::NotFound
}
