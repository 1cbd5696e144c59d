//! AES-GCM encryption and decryption of UTF-8 text.
//!
//! The AES variant follows the normalized key length (128, 192 or 256 bits).
//! Every encryption draws a fresh 96-bit IV; no associated data is used.
//!
//! # Transport form
//!
//! ```text
//! cipher_b64 = base64(ciphertext || tag[16])
//! iv_b64     = base64(iv[12])
//! ```

use aes_gcm::{
    aead::{consts::U12, AeadInPlace, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce, Tag,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, CryptoRng, RngCore};

use super::key::{normalize_key, NormalizedKey, AES_128_KEY_LEN, AES_192_KEY_LEN, AES_256_KEY_LEN};
use crate::error::CryptoError;

/// Byte length of a GCM IV.
pub const IV_LEN: usize = 12;

/// Byte length of a GCM authentication tag.
pub const TAG_LEN: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Base64 ciphertext (with tag appended) and Base64 IV from one encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedText {
    /// `base64(ciphertext || tag)`.
    pub cipher_b64: String,
    /// `base64(iv)`.
    pub iv_b64: String,
}

/// AES-GCM cipher bound to one normalized key.
///
/// [`AesGcmCipher::set_key`] replaces the key for subsequent calls only.
#[derive(Debug, Clone)]
pub struct AesGcmCipher {
    key: NormalizedKey,
}

impl AesGcmCipher {
    /// Create a cipher for `key`, normalized by [`normalize_key`].
    pub fn new(key: &str) -> Self {
        Self {
            key: normalize_key(key),
        }
    }

    /// Replace the key used by later operations.
    pub fn set_key(&mut self, key: &str) {
        self.key = normalize_key(key);
    }

    /// Length in bytes of the active normalized key.
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Encrypt `plaintext` with an IV drawn from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if the random source fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<SealedText, CryptoError> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    /// Encrypt `plaintext` with an IV drawn from `rng`.
    ///
    /// Output length of the decoded `cipher_b64` is always
    /// `plaintext.len() + TAG_LEN`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if `rng` fails or the primitive
    /// reports an internal error.
    pub fn encrypt_with_rng<R>(
        &self,
        rng: &mut R,
        plaintext: &str,
    ) -> Result<SealedText, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let mut iv = [0u8; IV_LEN];
        rng.try_fill_bytes(&mut iv)
            .map_err(|e| CryptoError::Encryption(format!("random source unavailable: {e}")))?;

        let cipher = GcmCipher::new(&self.key)?;
        let mut buffer = Vec::with_capacity(plaintext.len() + TAG_LEN);
        buffer.extend_from_slice(plaintext.as_bytes());
        let tag = cipher
            .seal_detached(Nonce::<U12>::from_slice(&iv), &mut buffer)
            .map_err(|_| CryptoError::Encryption("aead seal failed".into()))?;
        buffer.extend_from_slice(&tag);

        Ok(SealedText {
            cipher_b64: STANDARD.encode(&buffer),
            iv_b64: STANDARD.encode(iv),
        })
    }

    /// Decrypt and verify a Base64 ciphertext/IV pair.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Decoding`] if either input is not valid Base64.
    /// - [`CryptoError::MalformedCiphertext`] if the blob is shorter than the
    ///   tag or the IV is not [`IV_LEN`] bytes.
    /// - [`CryptoError::Authentication`] if the tag does not verify.
    /// - [`CryptoError::Encoding`] if the plaintext is not UTF-8.
    pub fn decrypt(&self, cipher_b64: &str, iv_b64: &str) -> Result<String, CryptoError> {
        let mut blob = STANDARD
            .decode(cipher_b64)
            .map_err(|_| CryptoError::Decoding { field: "ciphertext" })?;
        let iv = STANDARD
            .decode(iv_b64)
            .map_err(|_| CryptoError::Decoding { field: "iv" })?;

        if blob.len() < TAG_LEN {
            return Err(CryptoError::MalformedCiphertext {
                reason: format!("{} bytes is shorter than the {TAG_LEN}-byte tag", blob.len()),
            });
        }
        if iv.len() != IV_LEN {
            return Err(CryptoError::MalformedCiphertext {
                reason: format!("iv is {} bytes, expected {IV_LEN}", iv.len()),
            });
        }

        let tag_start = blob.len() - TAG_LEN;
        let tag: Tag = Tag::clone_from_slice(&blob[tag_start..]);
        blob.truncate(tag_start);

        GcmCipher::new(&self.key)?
            .open_detached(Nonce::<U12>::from_slice(&iv), &mut blob, &tag)
            .map_err(|_| CryptoError::Authentication)?;

        String::from_utf8(blob).map_err(|_| CryptoError::Encoding)
    }
}

/// Encrypt `plaintext` under `key` without keeping a cipher around.
pub fn encrypt_text<R>(key: &str, plaintext: &str, rng: &mut R) -> Result<SealedText, CryptoError>
where
    R: RngCore + CryptoRng,
{
    AesGcmCipher::new(key).encrypt_with_rng(rng, plaintext)
}

/// Decrypt a Base64 ciphertext/IV pair under `key`.
pub fn decrypt_text(key: &str, cipher_b64: &str, iv_b64: &str) -> Result<String, CryptoError> {
    AesGcmCipher::new(key).decrypt(cipher_b64, iv_b64)
}

/// AES-GCM instance of the width matching the key.
enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl GcmCipher {
    fn new(key: &NormalizedKey) -> Result<Self, CryptoError> {
        let bytes = key.as_bytes();
        let cipher = match bytes.len() {
            AES_128_KEY_LEN => Aes128Gcm::new_from_slice(bytes).map(Self::Aes128),
            AES_192_KEY_LEN => Aes192Gcm::new_from_slice(bytes).map(Self::Aes192),
            AES_256_KEY_LEN => Aes256Gcm::new_from_slice(bytes).map(Self::Aes256),
            n => return Err(CryptoError::Encryption(format!("unsupported key length {n}"))),
        };
        cipher.map_err(|_| CryptoError::Encryption("invalid key length".into()))
    }

    fn seal_detached(&self, nonce: &Nonce<U12>, buffer: &mut [u8]) -> Result<Tag, aes_gcm::Error> {
        match self {
            Self::Aes128(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
            Self::Aes192(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
            Self::Aes256(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
        }
    }

    fn open_detached(
        &self,
        nonce: &Nonce<U12>,
        buffer: &mut [u8],
        tag: &Tag,
    ) -> Result<(), aes_gcm::Error> {
        match self {
            Self::Aes128(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
            Self::Aes192(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
            Self::Aes256(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
        }
    }
}
