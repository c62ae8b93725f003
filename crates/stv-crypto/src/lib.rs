// crates/stv-crypto/src/lib.rs

//! Hashing substrate for the STARK verifier: Keccak digests, the
//! Fiat–Shamir [`PublicCoin`] and the [`ProofOfWork`] gate.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod coin;
pub mod hash;
pub mod pow;

use thiserror::Error;

pub use coin::PublicCoin;
pub use hash::{keccak256, masked_keccak, Digest, DIGEST_LEN};
pub use pow::ProofOfWork;

/// Misuse of the coin's query sampler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    /// More distinct indices requested than the range holds.
    #[error("cannot draw {count} distinct queries from 2^{bits} indices")]
    TooManyQueries {
        /// Requested number of indices.
        count: usize,
        /// Width of the index range.
        bits: u32,
    },
    /// Query width beyond 64 bits.
    #[error("query width {0} exceeds 64 bits")]
    QueryWidth(u32),
}
