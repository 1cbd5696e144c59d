//! Handler-level error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::ErrorResponse;
use thiserror::Error;

/// Errors returned by request handlers.
///
/// Variants map to HTTP status codes:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::NotFound`] → 404
///
/// The `Display` text is the `{ error }` body, so it must never carry key
/// material, plaintext, or detail about why decryption failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed or could not be decrypted.
    #[error("{0}")]
    BadRequest(String),

    /// Re-encryption of a successfully decrypted payload failed.
    #[error("{0}")]
    EncryptionFailure(String),

    /// No route matched.
    #[error("the requested resource does not exist")]
    NotFound,
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::EncryptionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::EncryptionFailure("x".into()).http_status(), 500);
        assert_eq!(ServiceError::NotFound.http_status(), 404);
    }

    #[test]
    fn display_is_the_bare_message() {
        let e = ServiceError::BadRequest("Key is required".into());
        assert_eq!(e.to_string(), "Key is required");
    }

    #[test]
    fn renders_error_body() {
        let resp = ServiceError::BadRequest("Invalid encrypted data format".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
