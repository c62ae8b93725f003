//! Proof-of-work admission gate.
//!
//! `seed = keccak(0x0123456789abcded || digest || bits)` and a nonce passes
//! when `keccak(seed || nonce_be)` starts with at least `bits` zero bits.

use crate::hash::{keccak256, Digest};

/// Domain separator prepended to the challenge seed.
pub const POW_PREFIX: [u8; 8] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xed];

/// A difficulty-bound challenge derived from a transcript digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofOfWork {
    seed: Digest,
    bits: u8,
}

impl ProofOfWork {
    /// Bind a challenge to `digest` at difficulty `bits`.
    #[must_use]
    pub fn new(digest: &Digest, bits: u8) -> Self {
        Self {
            seed: keccak256(&[POW_PREFIX.as_slice(), digest.as_bytes().as_slice(), &[bits]]),
            bits,
        }
    }

    /// Difficulty in leading zero bits.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Check a single externally supplied nonce. Zero difficulty always passes.
    #[must_use]
    pub fn check(&self, nonce: u64) -> bool {
        if self.bits == 0 {
            return true;
        }
        let candidate = keccak256(&[self.seed.as_bytes().as_slice(), &nonce.to_be_bytes()]);
        leading_zero_bits(&candidate) >= u32::from(self.bits)
    }
}

/// One-shot form of [`ProofOfWork::check`].
#[must_use]
pub fn check(digest: &Digest, nonce: u64, bits: u8) -> bool {
    ProofOfWork::new(digest, bits).check(nonce)
}

fn leading_zero_bits(d: &Digest) -> u32 {
    let mut total = 0;
    for byte in d.as_bytes() {
        if *byte == 0 {
            total += 8;
        } else {
            return total + byte.leading_zeros();
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zeros_cross_byte_boundaries() {
        let mut d = Digest::default();
        assert_eq!(leading_zero_bits(&d), 256);
        d.0[1] = 0x10;
        assert_eq!(leading_zero_bits(&d), 11);
    }

    #[test]
    fn zero_difficulty_accepts_anything() {
        let d = Digest([0xab; 32]);
        assert!(check(&d, 0, 0));
        assert!(check(&d, u64::MAX, 0));
    }
}
