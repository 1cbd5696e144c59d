//! Transport encoding for symmetric ciphertext.
//!
//! ```text
//! <cipher_b64>|<iv_b64>
//! ```
//!
//! The Base64 alphabet never contains `|`, so exactly one delimiter is
//! accepted. The asymmetric path has no envelope: its Base64 string is the
//! whole payload.

use std::fmt;
use std::str::FromStr;

use super::symmetric::SealedText;
use crate::error::CryptoError;

/// Separator between the ciphertext and IV fields.
pub const DELIMITER: char = '|';

/// A symmetric ciphertext and IV as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// `base64(ciphertext || tag)`.
    pub cipher_b64: String,
    /// `base64(iv)`.
    pub iv_b64: String,
}

impl Envelope {
    /// Build an envelope from its two fields.
    pub fn new(cipher_b64: impl Into<String>, iv_b64: impl Into<String>) -> Self {
        Self {
            cipher_b64: cipher_b64.into(),
            iv_b64: iv_b64.into(),
        }
    }

    /// Join the fields as `cipher_b64|iv_b64`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Split `cipher_b64|iv_b64` on its delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEnvelope`] if there is no delimiter or
    /// more than one.
    pub fn decode(envelope: &str) -> Result<Self, CryptoError> {
        let (cipher_b64, iv_b64) = envelope
            .split_once(DELIMITER)
            .ok_or(CryptoError::MalformedEnvelope { reason: "missing delimiter" })?;
        if iv_b64.contains(DELIMITER) {
            return Err(CryptoError::MalformedEnvelope { reason: "unexpected extra delimiter" });
        }
        Ok(Self::new(cipher_b64, iv_b64))
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.cipher_b64, self.iv_b64)
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<SealedText> for Envelope {
    fn from(sealed: SealedText) -> Self {
        Self {
            cipher_b64: sealed.cipher_b64,
            iv_b64: sealed.iv_b64,
        }
    }
}

impl From<Envelope> for SealedText {
    fn from(envelope: Envelope) -> Self {
        Self {
            cipher_b64: envelope.cipher_b64,
            iv_b64: envelope.iv_b64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_joins_with_pipe() {
        assert_eq!(Envelope::new("Y2lwaGVy", "aXY=").encode(), "Y2lwaGVy|aXY=");
    }

    #[test]
    fn missing_delimiter_is_rejected() {
        assert_eq!(
            Envelope::decode("abc"),
            Err(CryptoError::MalformedEnvelope { reason: "missing delimiter" })
        );
    }

    #[test]
    fn extra_delimiter_is_rejected() {
        assert!(matches!(
            "a|b|c".parse::<Envelope>(),
            Err(CryptoError::MalformedEnvelope { .. })
        ));
        assert!(Envelope::decode("a||").is_err());
    }

    #[test]
    fn empty_fields_survive_the_codec() {
        assert_eq!(Envelope::decode("|").unwrap(), Envelope::new("", ""));
    }

    #[test]
    fn display_matches_encode() {
        let e = Envelope::new("abc=", "def=");
        assert_eq!(e.to_string(), e.encode());
    }

    #[test]
    fn converts_from_sealed_text() {
        let sealed = SealedText {
            cipher_b64: "c".into(),
            iv_b64: "i".into(),
        };
        let envelope = Envelope::from(sealed.clone());
        assert_eq!(envelope.encode(), "c|i");
        assert_eq!(SealedText::from(envelope), sealed);
    }

    proptest! {
        #[test]
        fn round_trip_base64_safe_fields(c in "[A-Za-z0-9+/=]*", iv in "[A-Za-z0-9+/=]*") {
            let decoded = Envelope::decode(&Envelope::new(c.clone(), iv.clone()).encode()).unwrap();
            prop_assert_eq!(decoded, Envelope::new(c, iv));
        }
    }
}
