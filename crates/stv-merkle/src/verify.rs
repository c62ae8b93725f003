//! Multi-leaf proof verification.
//!
//! Leaves live at heap indices `2^depth + offset`; the root is index 1. A
//! FIFO worklist of `(index, digest)` pairs is collapsed one level at a time:
//! a node whose sibling is next in the queue merges with it, otherwise the
//! sibling is the next unused decommitment entry. The proof holds when the
//! worklist ends at index 1 with the declared root and every decommitment
//! entry was consumed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use stv_crypto::Digest;

use crate::hashable::{node_hash, Hashable};
use crate::MerkleError;

/// Deepest supported tree (heap indices must fit in `u64`).
pub const MAX_DEPTH: u32 = 63;

/// Claimed leaves plus the sibling digests needed to rebuild `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Declared root.
    pub root: Digest,
    /// `(leaf offset, leaf digest)` in strictly increasing offset order.
    pub claimed_values: Vec<(u64, Digest)>,
    /// Sibling digests in consumption order.
    pub decommitment: Vec<Digest>,
}

impl MerkleProof {
    /// Verify against a tree of the given depth.
    ///
    /// # Errors
    /// See [`verify`].
    pub fn verify(&self, depth: u32) -> Result<bool, MerkleError> {
        let (indices, leaves): (Vec<u64>, Vec<Digest>) = self.claimed_values.iter().copied().unzip();
        verify(&self.root, depth, &indices, &leaves, &self.decommitment)
    }
}

/// Check `leaves` at `indices` against `root`.
///
/// Returns `Ok(false)` for a proof that does not reproduce the root, including a
/// decommitment that is too short or too long.
///
/// # Errors
/// Malformed input: no claims, mismatched `indices`/`leaves` lengths, an
/// out-of-range or non-increasing index, or `depth > 63`.
pub fn verify<L: Hashable>(
    root: &Digest,
    depth: u32,
    indices: &[u64],
    leaves: &[L],
    decommitment: &[Digest],
) -> Result<bool, MerkleError> {
    if indices.is_empty() {
        return Err(MerkleError::NoClaimedData);
    }
    if indices.len() != leaves.len() {
        return Err(MerkleError::LengthMismatch {
            indices: indices.len(),
            leaves: leaves.len(),
        });
    }
    if depth > MAX_DEPTH {
        return Err(MerkleError::DepthTooLarge(depth));
    }
    let width = 1u64 << depth;
    let mut prev: Option<u64> = None;
    for &i in indices {
        if i >= width {
            return Err(MerkleError::IndexOutOfRange { index: i, depth });
        }
        if prev.is_some_and(|p| p >= i) {
            return Err(MerkleError::UnsortedIndices);
        }
        prev = Some(i);
    }

    let mut queue: VecDeque<(u64, Digest)> = indices
        .iter()
        .zip(leaves)
        .map(|(&i, leaf)| (width + i, leaf.hash()))
        .collect();
    let mut siblings = decommitment.iter();

    while let Some((index, digest)) = queue.pop_front() {
        if index == 1 {
            // Only the root may remain.
            return Ok(queue.is_empty() && siblings.next().is_none() && digest == *root);
        }
        let parent = if index % 2 == 0 {
            let right = match queue.front() {
                Some(&(next, sibling)) if next == index + 1 => {
                    let _ = queue.pop_front();
                    sibling
                }
                _ => match siblings.next() {
                    Some(d) => *d,
                    None => return Ok(false),
                },
            };
            node_hash(&digest, &right)
        } else {
            let Some(left) = siblings.next() else {
                return Ok(false);
            };
            node_hash(left, &digest)
        };
        queue.push_back((index / 2, parent));
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stv_field::FieldElement;

    #[test]
    fn empty_claims_are_malformed() {
        let err = verify::<Digest>(&Digest::default(), 3, &[], &[], &[]).unwrap_err();
        assert_eq!(err, MerkleError::NoClaimedData);
        assert_eq!(err.to_string(), "No claimed data");
    }

    #[test]
    fn index_validation() {
        let leaf = [FieldElement::ONE];
        assert!(matches!(
            verify(&Digest::default(), 2, &[4], &leaf, &[]),
            Err(MerkleError::IndexOutOfRange { index: 4, depth: 2 })
        ));
        let leaves = [FieldElement::ONE, FieldElement::ONE];
        assert_eq!(
            verify(&Digest::default(), 2, &[1, 1], &leaves, &[]),
            Err(MerkleError::UnsortedIndices)
        );
        assert!(matches!(
            verify(&Digest::default(), 2, &[1], &leaves, &[]),
            Err(MerkleError::LengthMismatch { .. })
        ));
        assert_eq!(
            verify(&Digest::default(), 64, &[0], &leaf, &[]),
            Err(MerkleError::DepthTooLarge(64))
        );
    }

    #[test]
    fn depth_zero_tree_is_its_leaf() {
        let leaf = FieldElement::from(7u64);
        assert_eq!(verify(&leaf.hash(), 0, &[0], &[leaf], &[]), Ok(true));
        assert_eq!(verify(&leaf.hash(), 0, &[0], &[leaf], &[Digest::default()]), Ok(false));
    }
}
