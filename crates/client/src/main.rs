//! `client`: one round trip per invocation.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging.
//! 4. Build the HTTP transport and run the requested round trip.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use client::config::Config;
use client::transport::HttpTransport;
use client::RoundTrip;

#[derive(Debug, Parser)]
#[command(name = "client", version, about = "Encrypt, send to the peer, decrypt the reply")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// AES-GCM round trip under a shared text key.
    Aes {
        /// Shared secret, normalised to an AES key on both sides.
        #[arg(short, long)]
        key: String,
        /// Text to send.
        plaintext: String,
    },
    /// RSA-OAEP round trip under the peer's public key.
    Rsa {
        /// Text to send.
        plaintext: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: client configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    client::telemetry::init(&cfg.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), peer = %cfg.peer_base_url, "client starting");

    // -----------------------------------------------------------------------
    // 4. Round trip
    // -----------------------------------------------------------------------
    let transport = HttpTransport::new(&cfg.peer_base_url, cfg.request_timeout())?;
    let round_trip = RoundTrip::new(transport);

    let outcome = match &cli.command {
        Command::Aes { key, plaintext } => round_trip.run_symmetric(plaintext, key).await.map(|r| {
            println!("sent:      {}", r.sent_envelope);
            println!("received:  {}", r.received_envelope);
            println!("plaintext: {}", r.plaintext);
            r.intact
        }),
        Command::Rsa { plaintext } => round_trip.run_asymmetric(plaintext).await.map(|r| {
            println!("sent:      {}", r.ciphertext_b64);
            println!("plaintext: {}", r.peer_plaintext);
            r.intact
        }),
    };

    match outcome {
        Ok(true) => {
            println!("match:     yes");
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            println!("match:     no");
            Ok(ExitCode::from(1))
        }
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            Ok(ExitCode::from(2))
        }
    }
}
