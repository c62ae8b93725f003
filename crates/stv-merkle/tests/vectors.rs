//! Multi-proof verification against committed vectors, plus random
//! commit/open/verify round trips.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use stv_crypto::Digest;
use stv_field::FieldElement;
use stv_merkle::{verify, MerkleError, MerkleProof, MerkleTree};

fn hex32(s: &str) -> Digest {
    let mut out = [0u8; 32];
    let v = hex::decode(s).unwrap();
    out[32 - v.len()..].copy_from_slice(&v);
    Digest(out)
}

/// 20-byte masked digest followed by 12 zero bytes.
fn masked(s: &str) -> Digest {
    let mut out = [0u8; 32];
    out[..20].copy_from_slice(&hex::decode(s).unwrap());
    Digest(out)
}

fn depth6_proof() -> MerkleProof {
    MerkleProof {
        root: masked("fd112f44bc944f33e2567f86eea202350913b11c"),
        claimed_values: vec![(1, hex32("0533")), (11, hex32("242d")), (14, hex32("3600"))],
        decommitment: vec![
            hex32("03e8"),
            hex32("1f40"),
            hex32("3d09"),
            masked("4ea8b9bafb11dafcfe132a26f8e343eaef0651d9"),
            masked("023a7ce535cadd222093be053ac26f9b800ee476"),
            masked("70b0744af2583d10e7e3236c731d37605e196e06"),
            masked("221aea6e87862ba2d03543d0aa82c6bffee310ae"),
            masked("68b58e5131703684edb16d41b763017dfaa24a35"),
            masked("e108b7dc670810e8588c67c2fde7ec4cc00165e8"),
        ],
    }
}

#[test]
fn valid_multi_proof() {
    assert_eq!(depth6_proof().verify(6), Ok(true));
}

#[test]
fn flipped_root_fails() {
    let mut p = depth6_proof();
    p.root.0[0] = 0xad;
    assert_eq!(p.verify(6), Ok(false));
}

#[test]
fn proof_loaded_from_json_verifies() {
    let json = serde_json::to_value(depth6_proof()).unwrap();
    assert_eq!(json["root"], "fd112f44bc944f33e2567f86eea202350913b11c000000000000000000000000");
    assert_eq!(json["claimed_values"][1][0], 11);
    let back: MerkleProof = serde_json::from_value(json).unwrap();
    assert_eq!(back, depth6_proof());
    assert_eq!(back.verify(6), Ok(true));
}

#[test]
fn truncated_decommitment_fails() {
    let mut p = depth6_proof();
    p.decommitment.remove(0);
    assert_eq!(p.verify(6), Ok(false));
}

#[test]
fn extended_decommitment_fails() {
    let mut p = depth6_proof();
    p.decommitment.push(Digest::default());
    assert_eq!(p.verify(6), Ok(false));
}

#[test]
fn shifted_index_fails() {
    let mut p = depth6_proof();
    p.claimed_values[0].0 = 0;
    assert_eq!(p.verify(6), Ok(false));
}

#[test]
fn reordered_decommitment_fails() {
    let mut p = depth6_proof();
    p.decommitment.swap(3, 4);
    assert_eq!(p.verify(6), Ok(false));
}

#[test]
fn complete_leaf_set_needs_no_decommitment() {
    let values = [0x3e8u64, 0x533, 0x6c0, 0x895, 0xab8, 0xd2f, 0x1000, 0x1331];
    let leaves: Vec<FieldElement> = values.iter().copied().map(FieldElement::from).collect();
    let indices: Vec<u64> = (0..8).collect();
    let root = masked("a438a228f242643e8accf6466333b760095bfe34");
    assert_eq!(verify(&root, 3, &indices, &leaves, &[]), Ok(true));

    let tree = MerkleTree::from_leaves(&leaves).unwrap();
    assert_eq!(tree.root(), root);
}

#[test]
fn no_claimed_data() {
    let p = MerkleProof {
        root: Digest::default(),
        claimed_values: vec![],
        decommitment: vec![],
    };
    let err = p.verify(6).unwrap_err();
    assert_eq!(err, MerkleError::NoClaimedData);
    assert_eq!(err.to_string(), "No claimed data");
}

fn leaves_and_subset() -> impl Strategy<Value = (Vec<Vec<FieldElement>>, Vec<u64>)> {
    (1u32..7).prop_flat_map(|depth| {
        let n = 1usize << depth;
        let all: Vec<u64> = (0..n as u64).collect();
        (
            proptest::collection::vec(proptest::collection::vec(any::<u64>(), 1..4), n),
            proptest::sample::subsequence(all, 1..=n),
        )
            .prop_map(|(rows, picked)| {
                let rows: Vec<Vec<FieldElement>> = rows
                    .into_iter()
                    .map(|r| r.into_iter().map(FieldElement::from).collect())
                    .collect();
                (rows, picked)
            })
    })
}

proptest! {
    #[test]
    fn opened_subsets_verify((rows, indices) in leaves_and_subset()) {
        let tree = MerkleTree::from_leaves(&rows).unwrap();
        let decommitment = tree.open(&indices).unwrap();
        let claimed: Vec<_> = indices.iter().map(|&i| rows[i as usize].clone()).collect();
        prop_assert_eq!(
            verify(&tree.root(), tree.depth(), &indices, &claimed, &decommitment),
            Ok(true)
        );
    }

    #[test]
    fn tampered_leaf_is_rejected((rows, indices) in leaves_and_subset(), delta in 1u64..1000) {
        let tree = MerkleTree::from_leaves(&rows).unwrap();
        let decommitment = tree.open(&indices).unwrap();
        let mut claimed: Vec<Vec<FieldElement>> =
            indices.iter().map(|&i| rows[i as usize].clone()).collect();
        claimed[0][0] += FieldElement::from(delta);
        prop_assert_eq!(
            verify(&tree.root(), tree.depth(), &indices, &claimed, &decommitment),
            Ok(false)
        );
    }
}
