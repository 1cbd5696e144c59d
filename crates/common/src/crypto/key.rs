//! Mapping of arbitrary key strings onto valid AES key lengths.
//!
//! This is zero-padding and truncation, not a key-derivation function: there
//! is no salt and no stretching, and a key string ending in NUL bytes is
//! indistinguishable from its shorter prefix. The rule exists only so that
//! both ends of the round trip agree on the same key bytes.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 key length in bytes.
pub const AES_128_KEY_LEN: usize = 16;

/// AES-192 key length in bytes.
pub const AES_192_KEY_LEN: usize = 24;

/// AES-256 key length in bytes.
pub const AES_256_KEY_LEN: usize = 32;

/// Key bytes of a valid AES length (16, 24 or 32).
///
/// Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NormalizedKey(Vec<u8>);

impl NormalizedKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes: always 16, 24 or 32.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` only once the key has been wiped with [`Zeroize::zeroize`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NormalizedKey({} bytes, [REDACTED])", self.0.len())
    }
}

/// Normalize a user-supplied key string to an AES key.
///
/// Operates on the UTF-8 bytes of `key`:
/// - shorter than 16 bytes: right-pad with zeroes to 16;
/// - longer than 32 bytes: keep the first 32;
/// - exactly 16, 24 or 32 bytes: unchanged;
/// - anything else: right-pad with zeroes to 32.
pub fn normalize_key(key: &str) -> NormalizedKey {
    let bytes = key.as_bytes();
    let target = match bytes.len() {
        n if n < AES_128_KEY_LEN => AES_128_KEY_LEN,
        n if n > AES_256_KEY_LEN => AES_256_KEY_LEN,
        AES_128_KEY_LEN | AES_192_KEY_LEN | AES_256_KEY_LEN => bytes.len(),
        _ => AES_256_KEY_LEN,
    };

    let mut out = vec![0u8; target];
    let take = bytes.len().min(target);
    out[..take].copy_from_slice(&bytes[..take]);
    NormalizedKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_key_is_sixteen_zero_bytes() {
        assert_eq!(normalize_key("").as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn short_key_is_zero_padded_to_sixteen() {
        let k = normalize_key("test-key-12345");
        assert_eq!(k.len(), 16);
        assert_eq!(&k.as_bytes()[..14], b"test-key-12345");
        assert_eq!(&k.as_bytes()[14..], &[0, 0]);
    }

    #[test]
    fn standard_lengths_are_untouched() {
        for s in [
            "0123456789abcdef",
            "0123456789abcdef01234567",
            "0123456789abcdef0123456789abcdef",
        ] {
            assert_eq!(normalize_key(s).as_bytes(), s.as_bytes());
        }
    }

    #[test]
    fn seventeen_bytes_pad_to_thirty_two() {
        let s = "0123456789abcdefg";
        let k = normalize_key(s);
        assert_eq!(k.len(), 32);
        assert_eq!(&k.as_bytes()[..17], s.as_bytes());
        assert_eq!(&k.as_bytes()[17..], &[0u8; 15]);
    }

    #[test]
    fn between_twenty_four_and_thirty_two_pads_to_thirty_two() {
        let k = normalize_key("0123456789abcdef012345678");
        assert_eq!(k.len(), 32);
    }

    #[test]
    fn long_key_is_truncated() {
        let s = "0123456789abcdef0123456789abcdefEXTRA";
        assert_eq!(normalize_key(s).as_bytes(), &s.as_bytes()[..32]);
    }

    #[test]
    fn length_is_measured_in_utf8_bytes() {
        // Six CJK characters are 18 bytes, so this pads to 32 rather than 16.
        let k = normalize_key("世界世界世界");
        assert_eq!(k.len(), 32);
        assert_eq!(&k.as_bytes()[..18], "世界世界世界".as_bytes());
    }

    #[test]
    fn key_is_wiped_on_drop_and_on_demand() {
        fn wiped_on_drop<T: ZeroizeOnDrop>() {}
        wiped_on_drop::<NormalizedKey>();

        let mut k = normalize_key("super-secret");
        k.zeroize();
        assert!(k.is_empty());
    }

    #[test]
    fn debug_redacts_key_material() {
        let dbg = format!("{:?}", normalize_key("super-secret"));
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("REDACTED"));
    }

    proptest! {
        #[test]
        fn output_length_is_always_valid(key in ".*") {
            let k = normalize_key(&key);
            prop_assert!(matches!(k.len(), 16 | 24 | 32));
            let prefix = key.len().min(k.len());
            prop_assert_eq!(&k.as_bytes()[..prefix], &key.as_bytes()[..prefix]);
            prop_assert!(k.as_bytes()[prefix..].iter().all(|&b| b == 0));
        }

        #[test]
        fn normalization_is_deterministic(key in ".*") {
            prop_assert_eq!(normalize_key(&key), normalize_key(&key));
        }
    }
}
