//! The peer's RSA key pair: generation, loading, export, and OAEP decryption.
//!
//! The private key never leaves this type. It is not logged and its `Debug`
//! output is redacted.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    Oaep, RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;
use thiserror::Error;

const PKCS1_PRIVATE_LABEL: &str = "BEGIN RSA PRIVATE KEY";

/// Errors produced by the key-pair layer.
#[derive(Debug, Error)]
pub enum KeyPairError {
    /// RSA key generation failed.
    #[error("failed to generate RSA key pair: {0}")]
    Generate(String),

    /// The private key PEM could not be parsed.
    #[error("failed to parse RSA private key: {0}")]
    Parse(String),

    /// The public key could not be encoded as PEM.
    #[error("failed to export RSA public key: {0}")]
    Export(String),

    /// The ciphertext is not valid Base64.
    #[error("invalid base64 ciphertext")]
    Decoding,

    /// OAEP decryption failed.
    #[error("RSA decryption failed")]
    Decryption,

    /// The decrypted bytes are not UTF-8.
    #[error("decrypted bytes are not valid UTF-8")]
    Encoding,
}

/// An RSA private key and its cached SPKI PEM public half.
pub struct PeerKeyPair {
    private: RsaPrivateKey,
    public_pem: String,
}

impl PeerKeyPair {
    /// Generate a fresh key pair of `bits` modulus size.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPairError::Generate`] if generation fails.
    pub fn generate(bits: usize) -> Result<Self, KeyPairError> {
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| KeyPairError::Generate(e.to_string()))?;
        Self::from_private_key(private)
    }

    /// Load a private key from PKCS#8 (`PRIVATE KEY`) or PKCS#1
    /// (`RSA PRIVATE KEY`) PEM.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPairError::Parse`] if the PEM is not an RSA private key.
    pub fn from_pem(pem: &str) -> Result<Self, KeyPairError> {
        let pem = pem.trim();
        let private = if pem.contains(PKCS1_PRIVATE_LABEL) {
            RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| KeyPairError::Parse(e.to_string()))?
        } else {
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| KeyPairError::Parse(e.to_string()))?
        };
        Self::from_private_key(private)
    }

    fn from_private_key(private: RsaPrivateKey) -> Result<Self, KeyPairError> {
        let public_pem = RsaPublicKey::from(&private)
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyPairError::Export(e.to_string()))?;
        Ok(Self { private, public_pem })
    }

    /// SPKI PEM of the public key.
    pub fn public_key_pem(&self) -> &str {
        &self.public_pem
    }

    /// Modulus size in bits.
    pub fn key_bits(&self) -> usize {
        self.private.size() * 8
    }

    /// Base64-decode and OAEP/SHA-256-decrypt `ciphertext_b64` to UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPairError::Decoding`], [`KeyPairError::Decryption`] or
    /// [`KeyPairError::Encoding`] for the respective stage.
    pub fn decrypt_b64(&self, ciphertext_b64: &str) -> Result<String, KeyPairError> {
        let ciphertext = STANDARD.decode(ciphertext_b64).map_err(|_| KeyPairError::Decoding)?;
        let plaintext = self
            .private
            .decrypt(Oaep::new::<Sha256>(), &ciphertext)
            .map_err(|_| KeyPairError::Decryption)?;
        String::from_utf8(plaintext).map_err(|_| KeyPairError::Encoding)
    }
}

impl std::fmt::Debug for PeerKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PeerKeyPair({} bits, [REDACTED])", self.key_bits())
    }
}
