//! In-memory tree over a power-of-two number of leaf digests.
//!
//! Builds the layers bottom-up and produces decommitments in exactly the order
//! [`verify`](crate::verify) consumes them. Used to commit test data and to
//! produce proofs for round-trip checks.

use std::collections::VecDeque;

use stv_crypto::Digest;

use crate::hashable::{node_hash, Hashable};
use crate::verify::MAX_DEPTH;
use crate::MerkleError;

/// Complete binary tree stored as a heap: `nodes[1]` is the root and the leaves
/// occupy `nodes[2^depth..2^(depth+1)]`.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: u32,
    nodes: Vec<Digest>,
}

impl MerkleTree {
    /// Commit to `leaves` (length must be a power of two).
    ///
    /// # Errors
    /// [`MerkleError::NotPowerOfTwo`] for an empty or ragged leaf set,
    /// [`MerkleError::DepthTooLarge`] beyond 63 levels.
    pub fn from_leaves<L: Hashable>(leaves: &[L]) -> Result<Self, MerkleError> {
        let n = leaves.len();
        if !n.is_power_of_two() {
            return Err(MerkleError::NotPowerOfTwo(n));
        }
        let depth = n.trailing_zeros();
        if depth > MAX_DEPTH {
            return Err(MerkleError::DepthTooLarge(depth));
        }
        let mut nodes = vec![Digest::default(); 2 * n];
        for (slot, leaf) in nodes[n..].iter_mut().zip(leaves) {
            *slot = leaf.hash();
        }
        for i in (1..n).rev() {
            nodes[i] = node_hash(&nodes[2 * i], &nodes[2 * i + 1]);
        }
        Ok(Self { depth, nodes })
    }

    /// Root digest.
    #[must_use]
    pub fn root(&self) -> Digest {
        self.nodes[1]
    }

    /// Number of levels below the root.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Decommitment for sorted, distinct leaf `indices`.
    ///
    /// # Errors
    /// Same index validation as [`verify`](crate::verify).
    pub fn open(&self, indices: &[u64]) -> Result<Vec<Digest>, MerkleError> {
        if indices.is_empty() {
            return Err(MerkleError::NoClaimedData);
        }
        let width = 1u64 << self.depth;
        if let Some(&bad) = indices.iter().find(|&&i| i >= width) {
            return Err(MerkleError::IndexOutOfRange {
                index: bad,
                depth: self.depth,
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MerkleError::UnsortedIndices);
        }

        let mut queue: VecDeque<u64> = indices.iter().map(|i| width + i).collect();
        let mut out = Vec::new();
        while let Some(index) = queue.pop_front() {
            if index == 1 {
                break;
            }
            if index % 2 == 0 && queue.front() == Some(&(index + 1)) {
                let _ = queue.pop_front();
            } else {
                out.push(self.nodes[(index ^ 1) as usize]);
            }
            queue.push_back(index / 2);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stv_field::FieldElement;

    #[test]
    fn ragged_leaf_sets_are_rejected() {
        let leaves = vec![FieldElement::ONE; 3];
        assert_eq!(MerkleTree::from_leaves(&leaves).unwrap_err(), MerkleError::NotPowerOfTwo(3));
    }

    #[test]
    fn full_opening_needs_no_siblings() {
        let leaves: Vec<FieldElement> = (0..8u64).map(FieldElement::from).collect();
        let tree = MerkleTree::from_leaves(&leaves).unwrap();
        assert!(tree.open(&(0..8).collect::<Vec<_>>()).unwrap().is_empty());
        assert_eq!(tree.open(&[3]).unwrap().len(), 3);
    }
}
