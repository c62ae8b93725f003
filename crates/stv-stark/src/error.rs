//! Verification outcomes and faults.
//!
//! Three categories are kept apart:
//! - malformed input and arithmetic faults are [`VerifierError`]s and stop
//!   verification immediately;
//! - a proof that is well formed but wrong yields [`Verdict::Rejected`] with
//!   the first failed check.

use core::fmt;

use stv_core::ParamsError;
use stv_crypto::CoinError;
use stv_field::FieldError;
use stv_merkle::MerkleError;
use thiserror::Error;

/// Malformed input or an arithmetic fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// No public inputs supplied.
    #[error("public inputs are empty")]
    EmptyPublicInputs,
    /// Public inputs do not decode for the chosen program.
    #[error("malformed public inputs: {0}")]
    PublicInputs(String),
    /// Parameters derived from the public inputs are inconsistent.
    #[error(transparent)]
    Params(#[from] ParamsError),
    /// A proof component has the wrong length.
    #[error("{what}: expected {expected} entries, got {got}")]
    ShapeMismatch {
        /// Component name.
        what: &'static str,
        /// Length implied by the parameters.
        expected: usize,
        /// Length found in the proof.
        got: usize,
    },
    /// The proof ran out of FRI values for a layer.
    #[error("FRI layer {layer}: not enough values in proof")]
    MissingFriValues {
        /// Layer number.
        layer: usize,
    },
    /// The proof carries FRI values that no coset needed.
    #[error("FRI layer {layer}: {extra} unused values in proof")]
    UnusedFriValues {
        /// Layer number.
        layer: usize,
        /// Number of surplus values.
        extra: usize,
    },
    /// A coset that does not fit its layer.
    #[error("coset {coset_index} of size {coset_size} does not fit a layer of {layer_len}")]
    InvalidCoset {
        /// Coset number within the layer.
        coset_index: u64,
        /// Number of values supplied.
        coset_size: usize,
        /// Layer length.
        layer_len: u64,
    },
    /// Malformed Merkle input.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// Query sampling misuse.
    #[error(transparent)]
    Coin(#[from] CoinError),
    /// Field fault (division by zero, domain out of range, bad encoding).
    #[error("arithmetic fault: {0}")]
    Arithmetic(#[from] FieldError),
}

/// The first check a well-formed proof failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Combined constraints disagree with the composition values at the OODS point.
    ConstraintMismatch,
    /// Proof-of-work nonce below difficulty.
    ProofOfWork,
    /// Trace rows do not open against the trace root.
    TraceDecommitment,
    /// Composition rows do not open against the constraint root.
    ConstraintDecommitment,
    /// FRI cosets do not open against the layer root.
    FriDecommitment {
        /// Layer number.
        layer: usize,
    },
    /// A folded value disagrees with the last-layer polynomial.
    LastLayer {
        /// Index within the last layer.
        index: u64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstraintMismatch => f.write_str("out-of-domain constraint mismatch"),
            Self::ProofOfWork => f.write_str("insufficient proof of work"),
            Self::TraceDecommitment => f.write_str("trace decommitment failed"),
            Self::ConstraintDecommitment => f.write_str("constraint decommitment failed"),
            Self::FriDecommitment { layer } => write!(f, "FRI layer {layer} decommitment failed"),
            Self::LastLayer { index } => write!(f, "last FRI layer mismatch at index {index}"),
        }
    }
}

/// Outcome of verifying a well-formed proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed.
    Accepted,
    /// The first failed check.
    Rejected(Rejection),
}

impl Verdict {
    /// `true` for [`Verdict::Accepted`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}
