//! Error taxonomy for the cryptographic core.

use thiserror::Error;

/// Message shown to users for every failure on the decryption path.
///
/// Tag mismatches, truncated blobs, bad Base64 and invalid UTF-8 all collapse
/// to this one string so that a caller cannot use the error text as an oracle.
pub const DECRYPTION_FAILED: &str = "decryption failed";

/// Errors produced by the key normalizer, ciphers, and wire codec.
///
/// `Display` carries the precise kind for logs and tests. Anything shown to an
/// end user must go through [`CryptoError::public_message`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The PEM input is malformed or is not an RSA public key.
    #[error("failed to parse public key: {0}")]
    KeyParse(String),

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted bytes are not valid UTF-8")]
    Encoding,

    /// A transport field is not valid Base64.
    #[error("invalid base64 in {field}")]
    Decoding {
        /// Which field failed to decode (`"ciphertext"`, `"iv"`).
        field: &'static str,
    },

    /// The decoded ciphertext blob or IV has an impossible length.
    #[error("malformed ciphertext: {reason}")]
    MalformedCiphertext {
        /// Short description of the structural problem.
        reason: String,
    },

    /// The `cipher|iv` envelope is missing its delimiter or has extra ones.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// Short description of the structural problem.
        reason: &'static str,
    },

    /// GCM tag verification failed.
    #[error("tag verification failed")]
    Authentication,

    /// The plaintext exceeds the OAEP bound for the key size.
    #[error("plaintext is {len} bytes, key allows at most {max}")]
    PlaintextTooLarge {
        /// UTF-8 byte length of the rejected plaintext.
        len: usize,
        /// Largest plaintext the key accepts.
        max: usize,
    },

    /// Internal failure: the random source or the primitive itself failed.
    #[error("encryption failed: {0}")]
    Encryption(String),
}

impl CryptoError {
    /// Returns `true` for every kind raised while opening a ciphertext.
    pub fn is_decryption_failure(&self) -> bool {
        match self {
            CryptoError::Encoding
            | CryptoError::Decoding { .. }
            | CryptoError::MalformedCiphertext { .. }
            | CryptoError::MalformedEnvelope { .. }
            | CryptoError::Authentication => true,
            CryptoError::KeyParse(_)
            | CryptoError::PlaintextTooLarge { .. }
            | CryptoError::Encryption(_) => false,
        }
    }

    /// The message that is safe to show to a user.
    pub fn public_message(&self) -> String {
        match self {
            CryptoError::KeyParse(_) => "invalid public key".into(),
            CryptoError::PlaintextTooLarge { len, max } => {
                format!("plaintext too large: {len} bytes exceeds the {max}-byte key limit")
            }
            CryptoError::Encryption(_) => "encryption failed".into(),
            CryptoError::Encoding
            | CryptoError::Decoding { .. }
            | CryptoError::MalformedCiphertext { .. }
            | CryptoError::MalformedEnvelope { .. }
            | CryptoError::Authentication => DECRYPTION_FAILED.into(),
        }
    }
}
