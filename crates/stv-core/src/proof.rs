//! The proof record exchanged with provers.
//!
//! Untrusted: the verifier checks every length against the parameters before
//! using a field, and never mutates the record.

use serde::{Deserialize, Serialize};
use serde_with::{formats::Lowercase, hex::Hex, serde_as, Bytes, IfIsHumanReadable};
use stv_crypto::Digest;
use stv_field::FieldElement;

use crate::params::ConstraintSystemParams;

/// One committed FRI layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriLayerProof {
    /// Merkle root over the layer's cosets.
    pub root: Digest,
    /// Coset members the verifier cannot compute itself, in coset order.
    pub values: Vec<FieldElement>,
    /// Merkle decommitment for the opened cosets.
    pub decommitment: Vec<Digest>,
}

/// A complete STARK proof.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarkProof {
    /// Program-specific public inputs (seed the transcript). Hex in
    /// human-readable formats, a byte string otherwise.
    #[serde_as(as = "IfIsHumanReadable<Hex<Lowercase>, Bytes>")]
    pub public_inputs: Vec<u8>,
    /// Root of the low-degree-extended trace commitment (row leaves).
    pub trace_root: Digest,
    /// Root of the composition-polynomial commitment.
    pub constraint_root: Digest,
    /// Trace values at the out-of-domain point, one per trace-layout entry.
    pub trace_oods_values: Vec<FieldElement>,
    /// Composition columns at `z^D`.
    pub constraint_oods_values: Vec<FieldElement>,
    /// One entry per FRI layout step.
    pub fri_layers: Vec<FriLayerProof>,
    /// Coefficients of the final low-degree polynomial.
    pub last_layer_coefficients: Vec<FieldElement>,
    /// Proof-of-work nonce.
    pub pow_nonce: u64,
    /// Trace rows at the sorted query indices.
    pub trace_values: Vec<Vec<FieldElement>>,
    /// Decommitment for `trace_values`.
    pub trace_decommitment: Vec<Digest>,
    /// Composition rows at the sorted query indices.
    pub constraint_values: Vec<Vec<FieldElement>>,
    /// Decommitment for `constraint_values`.
    pub constraint_decommitment: Vec<Digest>,
}

/// Compact description of a proof for logs and the CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProofSummary {
    /// Public input length in bytes.
    pub public_input_bytes: usize,
    /// Trace root.
    pub trace_root: Digest,
    /// Constraint root.
    pub constraint_root: Digest,
    /// Number of opened trace rows.
    pub opened_rows: usize,
    /// Number of FRI layers.
    pub fri_layers: usize,
    /// Total FRI values shipped.
    pub fri_values: usize,
    /// Total decommitment digests across all Merkle proofs.
    pub decommitment_digests: usize,
    /// Last-layer coefficient count.
    pub last_layer_coefficients: usize,
    /// Parameters, if a constraint system was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ConstraintSystemParams>,
}

impl StarkProof {
    /// Summarize the proof's shape.
    #[must_use]
    pub fn summary(&self) -> ProofSummary {
        ProofSummary {
            public_input_bytes: self.public_inputs.len(),
            trace_root: self.trace_root,
            constraint_root: self.constraint_root,
            opened_rows: self.trace_values.len(),
            fri_layers: self.fri_layers.len(),
            fri_values: self.fri_layers.iter().map(|l| l.values.len()).sum(),
            decommitment_digests: self.trace_decommitment.len()
                + self.constraint_decommitment.len()
                + self
                    .fri_layers
                    .iter()
                    .map(|l| l.decommitment.len())
                    .sum::<usize>(),
            last_layer_coefficients: self.last_layer_coefficients.len(),
            params: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_inputs_are_hex_in_json() {
        let proof = StarkProof {
            public_inputs: vec![0xde, 0xad],
            ..StarkProof::default()
        };
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["public_inputs"], "dead");
        let back: StarkProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn public_inputs_are_a_byte_string_in_cbor() {
        let proof = StarkProof {
            public_inputs: vec![1, 2, 3],
            ..StarkProof::default()
        };
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&proof, &mut buf).unwrap();
        let value: ciborium::value::Value = ciborium::de::from_reader(buf.as_slice()).unwrap();
        let inputs = value
            .as_map()
            .unwrap()
            .iter()
            .find(|(k, _)| k.as_text() == Some("public_inputs"))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(inputs.as_bytes(), Some(&vec![1, 2, 3]));
        let back: StarkProof = ciborium::de::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn odd_hex_public_inputs_are_rejected() {
        let mut json = serde_json::to_value(StarkProof::default()).unwrap();
        json["public_inputs"] = "abc".into();
        assert!(serde_json::from_value::<StarkProof>(json).is_err());
    }

    #[test]
    fn summary_counts_digests() {
        let proof = StarkProof {
            trace_decommitment: vec![Digest::default(); 3],
            fri_layers: vec![FriLayerProof {
                decommitment: vec![Digest::default(); 2],
                values: vec![FieldElement::ONE],
                ..FriLayerProof::default()
            }],
            ..StarkProof::default()
        };
        let s = proof.summary();
        assert_eq!(s.decommitment_digests, 5);
        assert_eq!(s.fri_values, 1);
    }
}
