//! 32-byte digests and the two Keccak flavours used by the protocol.
//!
//! - [`keccak256`]: plain Keccak-256, used by the public coin and proof of work.
//! - [`masked_keccak`]: Keccak-256 with the trailing 12 bytes cleared, used for
//!   Merkle nodes and multi-element leaves. Roots therefore end in zero bytes.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, Bytes, IfIsHumanReadable};
use sha3::{Digest as _, Keccak256};

/// Digest width in bytes.
pub const DIGEST_LEN: usize = 32;

/// Significant prefix of a masked digest.
pub const MASKED_LEN: usize = 20;

/// Opaque 32-byte hash value, compared as raw bytes. Serialized as bare hex
/// in human-readable formats and as a byte string otherwise.
#[serde_as]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(#[serde_as(as = "IfIsHumanReadable<Hex, Bytes>")] pub [u8; DIGEST_LEN]);

impl Digest {
    /// Borrow the bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Parse `0x`-prefixed (or bare) hex of exactly 64 digits.
    ///
    /// # Errors
    /// Returns the `hex` decoding error on bad digits or length.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut out)?;
        Ok(Self(out))
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

/// Keccak-256 of the concatenation of `parts`.
#[must_use]
pub fn keccak256(parts: &[&[u8]]) -> Digest {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    Digest(hasher.finalize().into())
}

/// Keccak-256 of the concatenation of `parts`, truncated to 160 bits.
#[must_use]
pub fn masked_keccak(parts: &[&[u8]]) -> Digest {
    let mut out = keccak256(parts);
    out.0[MASKED_LEN..].fill(0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_known_answer() {
        assert_eq!(
            keccak256(&[]).to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn concatenation_is_split_agnostic() {
        assert_eq!(
            keccak256(&[b"ab".as_slice(), b"c".as_slice()]),
            keccak256(&[b"abc".as_slice()])
        );
    }

    #[test]
    fn masking_clears_the_tail_only() {
        let full = keccak256(&[b"leaf".as_slice()]);
        let masked = masked_keccak(&[b"leaf".as_slice()]);
        assert_eq!(full.0[..MASKED_LEN], masked.0[..MASKED_LEN]);
        assert!(masked.0[MASKED_LEN..].iter().all(|b| *b == 0));
    }

    #[test]
    fn hex_and_json_forms() {
        let d = keccak256(&[b"x".as_slice()]);
        assert_eq!(Digest::from_hex(&d.to_string()).unwrap(), d);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", hex::encode(d.0)));
        assert_eq!(serde_json::from_str::<Digest>(&json).unwrap(), d);
        assert!(serde_json::from_str::<Digest>("\"1234\"").is_err());
        assert!(Digest::from_hex("0x1234").is_err());
    }
}
