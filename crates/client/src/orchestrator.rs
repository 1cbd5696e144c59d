//! One encrypt → send → receive → decrypt cycle per call.
//!
//! Every stage is terminal on failure: nothing is retried, and later stages
//! never run once an earlier one has failed.

use std::fmt;

use common::crypto::{AesGcmCipher, Envelope, RsaOaepEncryptor};
use common::protocol::{ProcessRequest, RsaProcessRequest};
use common::CryptoError;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::transport::{Transport, TransportError};

/// The step of a round trip at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching and parsing the peer's RSA public key.
    FetchPublicKey,
    /// Encrypting the user's plaintext.
    Encrypt,
    /// Sending the request and receiving the response.
    Send,
    /// Splitting the peer's envelope.
    Decode,
    /// Opening the peer's ciphertext.
    Decrypt,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::FetchPublicKey => "fetch public key",
            Stage::Encrypt => "encrypt",
            Stage::Send => "send",
            Stage::Decode => "decode",
            Stage::Decrypt => "decrypt",
        })
    }
}

/// A failed round trip.
#[derive(Debug, Error)]
pub enum RoundTripError {
    /// A cryptographic or codec step failed.
    #[error("{stage} stage failed: {source}")]
    Crypto {
        /// Where it failed.
        stage: Stage,
        /// The precise cause.
        #[source]
        source: CryptoError,
    },

    /// The exchange with the peer failed.
    #[error("{stage} stage failed: {source}")]
    Transport {
        /// Where it failed.
        stage: Stage,
        /// The precise cause.
        #[source]
        source: TransportError,
    },
}

impl RoundTripError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            RoundTripError::Crypto { stage, .. } | RoundTripError::Transport { stage, .. } => {
                *stage
            }
        }
    }

    /// The message to show a user. Peer `{ error }` strings pass through
    /// verbatim; decryption failures collapse to one generic message.
    pub fn user_message(&self) -> String {
        match self {
            RoundTripError::Crypto { source, .. } => source.public_message(),
            RoundTripError::Transport { source, .. } => match source {
                TransportError::Peer { message, .. } => message.clone(),
                TransportError::UnexpectedStatus(code) => format!("the peer returned HTTP {code}"),
                TransportError::Timeout => "the peer did not respond in time".into(),
                TransportError::InvalidBody(_) => "the peer sent an unreadable response".into(),
                TransportError::Request(_) => "could not reach the peer".into(),
            },
        }
    }
}

/// Outcome of a successful symmetric round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricReport {
    /// Envelope sent to the peer.
    pub sent_envelope: String,
    /// Envelope the peer returned.
    pub received_envelope: String,
    /// Plaintext recovered from the peer's envelope.
    pub plaintext: String,
    /// Whether the recovered plaintext equals the input.
    pub intact: bool,
}

/// Outcome of a successful asymmetric round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricReport {
    /// Base64 OAEP ciphertext sent to the peer.
    pub ciphertext_b64: String,
    /// Plaintext as decrypted by the peer.
    pub peer_plaintext: String,
    /// Whether the peer's plaintext equals the input.
    pub intact: bool,
}

/// Drives round trips over a [`Transport`].
///
/// The peer's public key is fetched on the first asymmetric run and reused
/// afterwards. A failed fetch leaves nothing cached.
pub struct RoundTrip<T> {
    transport: T,
    encryptor: OnceCell<RsaOaepEncryptor>,
}

impl<T: Transport> RoundTrip<T> {
    /// Create an orchestrator over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            encryptor: OnceCell::new(),
        }
    }

    /// AES-GCM: encrypt under `key`, have the peer decrypt and re-encrypt,
    /// then decrypt its answer.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage; see [`RoundTripError`].
    #[instrument(skip_all, fields(round_trip_id = %Uuid::new_v4(), scheme = "aes-gcm"))]
    pub async fn run_symmetric(
        &self,
        plaintext: &str,
        key: &str,
    ) -> Result<SymmetricReport, RoundTripError> {
        let cipher = AesGcmCipher::new(key);
        let sent = cipher
            .encrypt(plaintext)
            .map_err(|source| crypto_failure(Stage::Encrypt, source))?;
        let sent_envelope = Envelope::from(sent).encode();

        let response = self
            .transport
            .process(ProcessRequest {
                encrypted_data: sent_envelope.clone(),
                key: key.to_owned(),
            })
            .await
            .map_err(|source| transport_failure(Stage::Send, source))?;

        let received = Envelope::decode(&response.processed_data)
            .map_err(|source| crypto_failure(Stage::Decode, source))?;
        let recovered = cipher
            .decrypt(&received.cipher_b64, &received.iv_b64)
            .map_err(|source| crypto_failure(Stage::Decrypt, source))?;

        let intact = recovered == plaintext;
        info!(
            intact,
            plaintext_len = plaintext.len(),
            key_len = cipher.key_len(),
            "symmetric round trip complete"
        );
        Ok(SymmetricReport {
            sent_envelope,
            received_envelope: response.processed_data,
            plaintext: recovered,
            intact,
        })
    }

    /// RSA-OAEP: encrypt under the peer's public key and collect the
    /// plaintext it decrypted.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage; see [`RoundTripError`].
    #[instrument(skip_all, fields(round_trip_id = %Uuid::new_v4(), scheme = "rsa-oaep"))]
    pub async fn run_asymmetric(
        &self,
        plaintext: &str,
    ) -> Result<AsymmetricReport, RoundTripError> {
        let encryptor = self.encryptor().await?;
        let ciphertext_b64 = encryptor
            .encrypt(plaintext)
            .map_err(|source| crypto_failure(Stage::Encrypt, source))?;

        let response = self
            .transport
            .process_rsa(RsaProcessRequest {
                encrypted_data: ciphertext_b64.clone(),
            })
            .await
            .map_err(|source| transport_failure(Stage::Send, source))?;

        let intact = response.decrypted_data == plaintext;
        info!(intact, plaintext_len = plaintext.len(), "asymmetric round trip complete");
        Ok(AsymmetricReport {
            ciphertext_b64,
            peer_plaintext: response.decrypted_data,
            intact,
        })
    }

    async fn encryptor(&self) -> Result<&RsaOaepEncryptor, RoundTripError> {
        self.encryptor
            .get_or_try_init(|| async {
                let response = self
                    .transport
                    .public_key()
                    .await
                    .map_err(|source| transport_failure(Stage::FetchPublicKey, source))?;
                let encryptor = RsaOaepEncryptor::from_pem(&response.public_key)
                    .map_err(|source| crypto_failure(Stage::FetchPublicKey, source))?;
                info!(modulus_len = encryptor.modulus_len(), "peer public key cached");
                Ok::<_, RoundTripError>(encryptor)
            })
            .await
    }
}

fn crypto_failure(stage: Stage, source: CryptoError) -> RoundTripError {
    warn!(%stage, error = %source, "round trip aborted");
    RoundTripError::Crypto { stage, source }
}

fn transport_failure(stage: Stage, source: TransportError) -> RoundTripError {
    warn!(%stage, error = %source, "round trip aborted");
    RoundTripError::Transport { stage, source }
}
