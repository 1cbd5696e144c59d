//! [`Transport`] over HTTP/JSON using `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use common::protocol::{
    ErrorResponse, ProcessRequest, ProcessResponse, PublicKeyResponse, RsaProcessRequest,
    RsaProcessResponse,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Transport, TransportError};

const PROCESS_PATH: &str = "/api/process";
const PUBLIC_KEY_PATH: &str = "/api/rsa/public-key";
const RSA_PROCESS_PATH: &str = "/api/rsa/process";

/// HTTP transport bound to one peer base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from_reqwest)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, TransportError> {
        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(TransportError::from_reqwest);
        }

        let body = resp.bytes().await.map_err(TransportError::from_reqwest)?;
        debug!(status = status.as_u16(), body_len = body.len(), "peer returned error status");
        match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(err) => Err(TransportError::Peer {
                status: status.as_u16(),
                message: err.error,
            }),
            Err(_) => Err(TransportError::UnexpectedStatus(status.as_u16())),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, TransportError> {
        let resp = self
            .client
            .post(self.url(PROCESS_PATH))
            .json(&request)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;
        Self::read(resp).await
    }

    async fn public_key(&self) -> Result<PublicKeyResponse, TransportError> {
        let resp = self
            .client
            .get(self.url(PUBLIC_KEY_PATH))
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;
        Self::read(resp).await
    }

    async fn process_rsa(
        &self,
        request: RsaProcessRequest,
    ) -> Result<RsaProcessResponse, TransportError> {
        let resp = self
            .client
            .post(self.url(RSA_PROCESS_PATH))
            .json(&request)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;
        Self::read(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use common::crypto::{AesGcmCipher, Envelope};
    use peer::keys::PeerKeyPair;
    use peer::server::{router, state::AppState};

    const PRIVATE_2048: &str = include_str!("../../../../testdata/rsa2048_private.pem");

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_peer() -> HttpTransport {
        let state = AppState::new(PeerKeyPair::from_pem(PRIVATE_2048).unwrap());
        let base = spawn(router::build(state)).await;
        HttpTransport::new(&format!("{base}/"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let t = HttpTransport::new("http://peer:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(t.url(PROCESS_PATH), "http://peer:8080/api/process");
    }

    #[tokio::test]
    async fn process_against_peer() {
        let transport = spawn_peer().await;
        let cipher = AesGcmCipher::new("k");
        let envelope = Envelope::from(cipher.encrypt("ping").unwrap()).encode();

        let resp = transport
            .process(ProcessRequest {
                encrypted_data: envelope,
                key: "k".into(),
            })
            .await
            .unwrap();
        let returned = Envelope::decode(&resp.processed_data).unwrap();
        assert_eq!(cipher.decrypt(&returned.cipher_b64, &returned.iv_b64).unwrap(), "ping");
    }

    #[tokio::test]
    async fn peer_error_body_is_surfaced_verbatim() {
        let transport = spawn_peer().await;
        let err = transport
            .process(ProcessRequest {
                encrypted_data: "abc|def".into(),
                key: String::new(),
            })
            .await
            .unwrap_err();
        match err {
            TransportError::Peer { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Key is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn public_key_is_fetched() {
        let transport = spawn_peer().await;
        let resp = transport.public_key().await.unwrap();
        assert!(resp.public_key.contains("BEGIN PUBLIC KEY"));
    }

    #[tokio::test]
    async fn non_json_error_is_unexpected_status() {
        let app = Router::new().route(
            "/api/rsa/public-key",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let transport = HttpTransport::new(&spawn(app).await, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            transport.public_key().await,
            Err(TransportError::UnexpectedStatus(502))
        ));
    }

    #[tokio::test]
    async fn wrong_success_shape_is_invalid_body() {
        let app = Router::new().route("/api/rsa/public-key", get(|| async { "not json" }));
        let transport = HttpTransport::new(&spawn(app).await, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            transport.public_key().await,
            Err(TransportError::InvalidBody(_))
        ));
    }

    #[tokio::test]
    async fn slow_peer_times_out() {
        let app = Router::new().route(
            "/api/rsa/public-key",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let transport = HttpTransport::new(&spawn(app).await, Duration::from_millis(100)).unwrap();
        assert!(matches!(transport.public_key().await, Err(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn unreachable_peer_is_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport =
            HttpTransport::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            transport.public_key().await,
            Err(TransportError::Request(_))
        ));
    }
}
