//! Leaf hashing.
//!
//! A lone 32-byte value is its own leaf digest. Several field elements (a
//! trace row or a FRI coset) hash to the masked Keccak of their concatenated
//! big-endian encodings.

use stv_crypto::{masked_keccak, Digest};
use stv_field::{FieldElement, ENCODED_LEN};

/// Anything that can sit in a Merkle leaf.
pub trait Hashable {
    /// Leaf digest.
    fn hash(&self) -> Digest;
}

impl Hashable for Digest {
    fn hash(&self) -> Digest {
        *self
    }
}

impl Hashable for FieldElement {
    fn hash(&self) -> Digest {
        Digest(self.to_be_bytes())
    }
}

impl Hashable for [FieldElement] {
    fn hash(&self) -> Digest {
        if let [single] = self {
            return single.hash();
        }
        let mut buf = Vec::with_capacity(self.len() * ENCODED_LEN);
        for v in self {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        masked_keccak(&[buf.as_slice()])
    }
}

impl Hashable for Vec<FieldElement> {
    fn hash(&self) -> Digest {
        self.as_slice().hash()
    }
}

impl<T: Hashable + ?Sized> Hashable for &T {
    fn hash(&self) -> Digest {
        (**self).hash()
    }
}

/// Interior node: `masked_keccak(left || right)`.
#[inline]
#[must_use]
pub fn node_hash(left: &Digest, right: &Digest) -> Digest {
    masked_keccak(&[left.as_bytes().as_slice(), right.as_bytes().as_slice()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_element_leaf_is_identity() {
        let x = FieldElement::from(0x533u64);
        assert_eq!(vec![x].hash(), x.hash());
        assert_eq!(x.hash().0[31], 0x33);
    }

    #[test]
    fn rows_are_masked() {
        let row = vec![FieldElement::from(1u64), FieldElement::from(2u64)];
        assert!(row.hash().0[20..].iter().all(|b| *b == 0));
        assert_ne!(row.hash(), vec![FieldElement::from(2u64), FieldElement::from(1u64)].hash());
    }
}
