// crates/stv-merkle/src/lib.rs

//! Merkle commitments with masked-Keccak nodes.
//!
//! - [`Hashable`]: leaf digests for field elements, rows and raw digests.
//! - [`verify`] / [`MerkleProof`]: multi-leaf proofs checked with an explicit
//!   worklist (no recursion).
//! - [`MerkleTree`]: an in-memory committer producing compatible decommitments.

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

mod hashable;
mod tree;
mod verify;

use thiserror::Error;

pub use hashable::{node_hash, Hashable};
pub use tree::MerkleTree;
pub use verify::{verify, MerkleProof, MAX_DEPTH};

/// Malformed Merkle input. A proof that simply fails to reproduce the root is
/// not an error; `verify` returns `Ok(false)` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// Nothing to verify.
    #[error("No claimed data")]
    NoClaimedData,
    /// `indices` and `leaves` disagree in length.
    #[error("{indices} indices but {leaves} leaves")]
    LengthMismatch {
        /// Number of indices.
        indices: usize,
        /// Number of leaves.
        leaves: usize,
    },
    /// Leaf offset outside `[0, 2^depth)`.
    #[error("leaf index {index} out of range for depth {depth}")]
    IndexOutOfRange {
        /// Offending offset.
        index: u64,
        /// Tree depth.
        depth: u32,
    },
    /// Offsets not strictly increasing.
    #[error("leaf indices must be strictly increasing")]
    UnsortedIndices,
    /// Tree too deep for `u64` heap indices.
    #[error("tree depth {0} exceeds the supported maximum")]
    DepthTooLarge(u32),
    /// Leaf count is not a power of two.
    #[error("leaf count {0} is not a power of two")]
    NotPowerOfTwo(usize),
}
