//! End-to-end round trips against the reference peer over real HTTP.

use std::time::Duration;

use client::transport::HttpTransport;
use client::{RoundTrip, Stage};
use peer::keys::PeerKeyPair;
use peer::server::{router, state::AppState};

const PRIVATE_2048: &str = include_str!("../../../testdata/rsa2048_private.pem");

async fn spawn_peer() -> RoundTrip<HttpTransport> {
    let app = router::build(AppState::new(PeerKeyPair::from_pem(PRIVATE_2048).unwrap()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let transport = HttpTransport::new(&format!("http://{addr}"), Duration::from_secs(10)).unwrap();
    RoundTrip::new(transport)
}

#[tokio::test]
async fn symmetric_round_trip_through_peer() {
    let rt = spawn_peer().await;
    let report = rt.run_symmetric("hello, 世界", "test-key-12345").await.unwrap();
    assert!(report.intact);
    assert_eq!(report.plaintext, "hello, 世界");
    assert_ne!(report.sent_envelope, report.received_envelope);
}

#[tokio::test]
async fn symmetric_round_trip_with_long_key() {
    let rt = spawn_peer().await;
    let key = "k".repeat(40);
    assert!(rt.run_symmetric("truncated key", &key).await.unwrap().intact);
}

#[tokio::test]
async fn empty_key_is_rejected_by_peer() {
    let rt = spawn_peer().await;
    let err = rt.run_symmetric("x", "").await.unwrap_err();
    assert_eq!(err.stage(), Stage::Send);
    assert_eq!(err.user_message(), "Key is required");
}

#[tokio::test]
async fn asymmetric_round_trip_through_peer() {
    let rt = spawn_peer().await;
    for text in ["test", "hello, 世界", &"a".repeat(190)] {
        let report = rt.run_asymmetric(text).await.unwrap();
        assert!(report.intact);
        assert_eq!(report.peer_plaintext, text);
    }
}

#[tokio::test]
async fn asymmetric_rejects_oversized_plaintext_locally() {
    let rt = spawn_peer().await;
    let err = rt.run_asymmetric(&"a".repeat(191)).await.unwrap_err();
    assert_eq!(err.stage(), Stage::Encrypt);
}
