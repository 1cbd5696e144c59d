//! Cryptographic core, error taxonomy, and protocol types shared by the
//! round-trip client and the reference peer.

pub mod crypto;
pub mod error;
pub mod protocol;

pub use error::CryptoError;
