//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/api/process", post(handlers::process))
        .route("/api/rsa/public-key", get(handlers::public_key))
        .route("/api/rsa/process", post(handlers::rsa_process))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
