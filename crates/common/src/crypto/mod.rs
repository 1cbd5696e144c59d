//! Cryptographic core: key normalization, AES-GCM, RSA-OAEP, wire encoding.
//!
//! This module is free of HTTP and async dependencies. Every operation is
//! synchronous and CPU-bound; randomness is injectable on every path that
//! consumes it.
//!
//! # Symmetric wire format
//!
//! ```text
//! base64(ciphertext || tag[16]) | base64(iv[12])
//! ```

pub mod asymmetric;
pub mod key;
pub mod symmetric;
pub mod wire;

pub use asymmetric::{rsa_encrypt, RsaOaepEncryptor};
pub use key::{normalize_key, NormalizedKey};
pub use symmetric::{decrypt_text, encrypt_text, AesGcmCipher, SealedText, IV_LEN, TAG_LEN};
pub use wire::Envelope;
