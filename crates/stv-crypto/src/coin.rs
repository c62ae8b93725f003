//! Fiat–Shamir public coin over Keccak-256.
//!
//! State is `(digest, counter)`. Writes absorb prover data into the digest and
//! reset the counter; reads hash the digest with the counter (as a 32-byte
//! big-endian word) and bump the counter. One coin belongs to one verification
//! run and is threaded through it by `&mut`.

use std::collections::BTreeSet;

use stv_field::{FieldElement, ENCODED_LEN};

use crate::hash::{keccak256, Digest, DIGEST_LEN};
use crate::CoinError;

/// Deterministic transcript shared (by construction, not by memory) between
/// prover and verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicCoin {
    digest: Digest,
    counter: u64,
}

impl PublicCoin {
    /// Seed a fresh coin: `digest = keccak(seed)`, `counter = 0`.
    #[must_use]
    pub fn new(seed: &[u8]) -> Self {
        Self {
            digest: keccak256(&[seed]),
            counter: 0,
        }
    }

    /// Current digest.
    #[inline]
    #[must_use]
    pub const fn digest(&self) -> Digest {
        self.digest
    }

    /// Number of reads since the last write.
    #[inline]
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Absorb `data`: `digest = keccak(digest || data)`, counter reset.
    pub fn write(&mut self, data: &[u8]) {
        self.digest = keccak256(&[self.digest.as_bytes().as_slice(), data]);
        self.counter = 0;
    }

    /// Absorb a digest (a commitment root).
    pub fn write_digest(&mut self, digest: &Digest) {
        self.write(digest.as_bytes());
    }

    /// Absorb field elements as one write of their 32-byte encodings.
    pub fn write_field_elements(&mut self, values: &[FieldElement]) {
        let mut buf = Vec::with_capacity(values.len() * ENCODED_LEN);
        for v in values {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        self.write(&buf);
    }

    /// Raw 32-byte read.
    fn next_block(&mut self) -> [u8; DIGEST_LEN] {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&self.counter.to_be_bytes());
        self.counter += 1;
        keccak256(&[self.digest.as_bytes().as_slice(), word.as_slice()]).0
    }

    /// Raw hash output, no reduction.
    pub fn read_digest(&mut self) -> Digest {
        Digest(self.next_block())
    }

    /// Uniform field element by rejection sampling on 252-bit candidates.
    pub fn read_field(&mut self) -> FieldElement {
        loop {
            let mut block = self.next_block();
            block[0] &= 0x0f;
            if let Ok(x) = FieldElement::from_be_bytes(&block) {
                return x;
            }
        }
    }

    /// `n` consecutive [`read_field`](Self::read_field) draws.
    pub fn read_field_elements(&mut self, n: usize) -> Vec<FieldElement> {
        (0..n).map(|_| self.read_field()).collect()
    }

    /// Index in `[0, 2^bits)` from the low 64-bit word of one read.
    /// `bits` above 64 behave as 64.
    pub fn read_query(&mut self, bits: u32) -> u64 {
        let block = self.next_block();
        let mut low = [0u8; 8];
        low.copy_from_slice(&block[24..]);
        let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
        u64::from_be_bytes(low) & mask
    }

    /// `count` distinct indices in `[0, 2^bits)`, sorted ascending.
    /// Duplicates are discarded and drawn again.
    ///
    /// # Errors
    /// [`CoinError::QueryWidth`] for `bits > 64`, [`CoinError::TooManyQueries`]
    /// when the range holds fewer than `count` indices.
    pub fn read_queries(&mut self, count: usize, bits: u32) -> Result<Vec<u64>, CoinError> {
        if bits > 64 {
            return Err(CoinError::QueryWidth(bits));
        }
        if count as u128 > 1u128 << bits {
            return Err(CoinError::TooManyQueries { count, bits });
        }
        let mut picked = BTreeSet::new();
        while picked.len() < count {
            picked.insert(self.read_query(bits));
        }
        Ok(picked.into_iter().collect())
    }
}
