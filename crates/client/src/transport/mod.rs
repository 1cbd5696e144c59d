//! The seam between the orchestrator and the network.
//!
//! [`Transport`] is the only async boundary in the client. Implementations
//! carry JSON bodies to the peer and back; they never touch key material.

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use common::protocol::{
    ProcessRequest, ProcessResponse, PublicKeyResponse, RsaProcessRequest, RsaProcessResponse,
};
use thiserror::Error;

/// Errors produced while talking to the peer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer answered with an `{ error }` body.
    #[error("peer rejected request ({status}): {message}")]
    Peer {
        /// HTTP status code.
        status: u16,
        /// The peer's `error` string, unmodified.
        message: String,
    },

    /// The peer answered with a non-2xx status and no `{ error }` body.
    #[error("peer returned unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// The request exceeded the configured timeout.
    #[error("request to peer timed out")]
    Timeout,

    /// The peer's 2xx body did not match the expected shape.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// Connection or protocol failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Classify a `reqwest` failure.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::InvalidBody(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Request/response exchange with the remote peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /api/process`.
    async fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, TransportError>;

    /// `GET /api/rsa/public-key`.
    async fn public_key(&self) -> Result<PublicKeyResponse, TransportError>;

    /// `POST /api/rsa/process`.
    async fn process_rsa(
        &self,
        request: RsaProcessRequest,
    ) -> Result<RsaProcessResponse, TransportError>;
}
