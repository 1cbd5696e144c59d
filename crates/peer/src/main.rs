//! `peer`: reference remote peer binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Load or generate the RSA key pair.
//! 4. Build the Axum router and start the HTTP server.

use anyhow::Result;
use tracing::info;

use peer::config::Config;
use peer::server::{router, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: peer configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    peer::telemetry::init(&cfg.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), listen_port = cfg.listen_port, "peer starting");

    // -----------------------------------------------------------------------
    // 3. RSA key pair
    // -----------------------------------------------------------------------
    let keys = peer::load_key_pair(&cfg)?;

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = router::build(AppState::new(keys));
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
