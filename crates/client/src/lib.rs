//! Round-trip client for the AES-GCM / RSA-OAEP harness.
//!
//! Encrypts user input, sends it to the peer over a [`transport::Transport`],
//! decrypts the reply, and reports whether the text survived.

pub mod config;
pub mod orchestrator;
pub mod telemetry;
pub mod transport;

pub use orchestrator::{AsymmetricReport, RoundTrip, RoundTripError, Stage, SymmetricReport};
