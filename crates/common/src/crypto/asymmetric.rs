//! RSA-OAEP encryption under a PEM-encoded public key.
//!
//! SHA-256 is used for both the OAEP hash and MGF1. Only the public half lives
//! here; decryption belongs to whoever holds the private key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use rsa::{
    pkcs1::DecodeRsaPublicKey, pkcs8::DecodePublicKey, traits::PublicKeyParts, Oaep, RsaPublicKey,
};
use sha2::Sha256;

use crate::error::CryptoError;

/// Output length of SHA-256, the OAEP hash.
pub const OAEP_HASH_LEN: usize = 32;

const PKCS1_PUBLIC_LABEL: &str = "BEGIN RSA PUBLIC KEY";

/// A parsed RSA public key ready for OAEP/SHA-256 encryption.
#[derive(Debug, Clone)]
pub struct RsaOaepEncryptor {
    key: RsaPublicKey,
}

impl RsaOaepEncryptor {
    /// Parse a PEM public key in SPKI (`PUBLIC KEY`) or PKCS#1
    /// (`RSA PUBLIC KEY`) form.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyParse`] for malformed PEM or a non-RSA key.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let pem = pem.trim();
        let key = if pem.contains(PKCS1_PUBLIC_LABEL) {
            RsaPublicKey::from_pkcs1_pem(pem).map_err(|e| e.to_string())
        } else {
            RsaPublicKey::from_public_key_pem(pem).map_err(|e| e.to_string())
        }
        .map_err(CryptoError::KeyParse)?;
        Ok(Self { key })
    }

    /// Wrap an already-parsed key.
    pub fn from_public_key(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// Modulus length in bytes; also the ciphertext length.
    pub fn modulus_len(&self) -> usize {
        self.key.size()
    }

    /// Largest plaintext, in bytes, this key can encrypt:
    /// `modulus_len - 2 * OAEP_HASH_LEN - 2`.
    pub fn max_plaintext_len(&self) -> usize {
        self.modulus_len().saturating_sub(2 * OAEP_HASH_LEN + 2)
    }

    /// Encrypt with padding randomness from the OS CSPRNG.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    /// Encrypt the UTF-8 bytes of `plaintext` and return standard Base64.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::PlaintextTooLarge`] if the UTF-8 encoding is
    /// longer than [`Self::max_plaintext_len`], or
    /// [`CryptoError::Encryption`] if the primitive fails.
    pub fn encrypt_with_rng<R>(
        &self,
        rng: &mut R,
        plaintext: &str,
    ) -> Result<String, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let bytes = plaintext.as_bytes();
        let max = self.max_plaintext_len();
        if bytes.len() > max {
            return Err(CryptoError::PlaintextTooLarge { len: bytes.len(), max });
        }

        let ciphertext = self
            .key
            .encrypt(rng, Oaep::new::<Sha256>(), bytes)
            .map_err(|e| match e {
                rsa::Error::MessageTooLong => CryptoError::PlaintextTooLarge {
                    len: bytes.len(),
                    max,
                },
                other => CryptoError::Encryption(other.to_string()),
            })?;

        Ok(STANDARD.encode(ciphertext))
    }
}

/// Parse `public_key_pem` and encrypt `plaintext` under it in one step.
pub fn rsa_encrypt<R>(
    public_key_pem: &str,
    plaintext: &str,
    rng: &mut R,
) -> Result<String, CryptoError>
where
    R: RngCore + CryptoRng,
{
    RsaOaepEncryptor::from_pem(public_key_pem)?.encrypt_with_rng(rng, plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::{pkcs8::DecodePrivateKey, RsaPrivateKey};

    const PUBLIC_2048: &str = include_str!("../../../../testdata/rsa2048_public.pem");
    const PUBLIC_2048_PKCS1: &str = include_str!("../../../../testdata/rsa2048_public_pkcs1.pem");
    const PRIVATE_2048: &str = include_str!("../../../../testdata/rsa2048_private.pem");
    const PUBLIC_1024: &str = include_str!("../../../../testdata/rsa1024_public.pem");

    fn decrypt(b64: &str) -> String {
        let sk = RsaPrivateKey::from_pkcs8_pem(PRIVATE_2048).unwrap();
        let bytes = sk.decrypt(Oaep::new::<Sha256>(), &STANDARD.decode(b64).unwrap()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn ciphertext_is_modulus_length() {
        let b64 = rsa_encrypt(PUBLIC_2048, "test", &mut OsRng).unwrap();
        assert_eq!(STANDARD.decode(&b64).unwrap().len(), 256);
        assert_eq!(b64.len(), 344);
        assert_eq!(decrypt(&b64), "test");
    }

    #[test]
    fn oaep_bound_per_key_size() {
        assert_eq!(RsaOaepEncryptor::from_pem(PUBLIC_2048).unwrap().max_plaintext_len(), 190);
        assert_eq!(RsaOaepEncryptor::from_pem(PUBLIC_1024).unwrap().max_plaintext_len(), 62);
    }

    #[test]
    fn one_byte_under_bound_succeeds_one_over_fails() {
        let enc = RsaOaepEncryptor::from_pem(PUBLIC_2048).unwrap();
        let max = enc.max_plaintext_len();

        let fits = "a".repeat(max);
        assert_eq!(decrypt(&enc.encrypt(&fits).unwrap()), fits);

        let over = "a".repeat(max + 1);
        assert_eq!(
            enc.encrypt(&over),
            Err(CryptoError::PlaintextTooLarge { len: max + 1, max })
        );
    }

    #[test]
    fn bound_counts_utf8_bytes_not_chars() {
        let enc = RsaOaepEncryptor::from_pem(PUBLIC_2048).unwrap();
        // 64 characters but 192 bytes.
        let wide = "界".repeat(64);
        assert!(matches!(enc.encrypt(&wide), Err(CryptoError::PlaintextTooLarge { len: 192, .. })));

        let ok = "héllo, 世界 🌍";
        assert_eq!(decrypt(&enc.encrypt(ok).unwrap()), ok);
    }

    #[test]
    fn empty_plaintext_encrypts() {
        let b64 = rsa_encrypt(PUBLIC_2048, "", &mut OsRng).unwrap();
        assert_eq!(decrypt(&b64), "");
    }

    #[test]
    fn pkcs1_pem_is_accepted() {
        let spki = RsaOaepEncryptor::from_pem(PUBLIC_2048).unwrap();
        let pkcs1 = RsaOaepEncryptor::from_pem(PUBLIC_2048_PKCS1).unwrap();
        assert_eq!(spki.modulus_len(), pkcs1.modulus_len());
        assert_eq!(decrypt(&pkcs1.encrypt("via pkcs1").unwrap()), "via pkcs1");
    }

    #[test]
    fn malformed_pem_is_key_parse_error() {
        let garbage = "-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----";
        assert!(matches!(
            RsaOaepEncryptor::from_pem(garbage),
            Err(CryptoError::KeyParse(_))
        ));
        assert!(matches!(RsaOaepEncryptor::from_pem(""), Err(CryptoError::KeyParse(_))));
    }

    #[test]
    fn private_key_pem_is_rejected() {
        assert!(matches!(
            RsaOaepEncryptor::from_pem(PRIVATE_2048),
            Err(CryptoError::KeyParse(_))
        ));
    }

    #[test]
    fn encryption_is_randomized() {
        let enc = RsaOaepEncryptor::from_pem(PUBLIC_2048).unwrap();
        assert_ne!(enc.encrypt("same").unwrap(), enc.encrypt("same").unwrap());
    }
}
