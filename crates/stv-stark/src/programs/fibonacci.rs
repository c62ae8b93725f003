//! Fibonacci program: "the `index`-th element of the sequence starting
//! `1, secret` is `value`".
//!
//! The trace has two columns and `n = max(2, next_pow2(index + 1))` rows;
//! row 0 is `(1, secret)` and each next row is `(T1, T0 + T1)`. With `ω` the
//! trace generator the constraints are
//!
//! - `C0 = (T0(ωz) − T1(z)) · (z − ω^(n−1)) / (z^n − 1)`
//! - `C1 = (T1(ωz) − T0(z) − T1(z)) · (z − ω^(n−1)) / (z^n − 1)`
//! - `C2 = (T0(z) − 1) / (z − 1)`
//! - `C3 = (T0(z) − value) / (z − ω^index)`
//!
//! each combined as `(α_i + β_i · z^(adj_i)) · C_i` with `adj = n − 1` for the
//! transitions and `1` for the boundaries, so the composition has degree `< n`.

use serde::{Deserialize, Serialize};
use stv_core::{ConstraintSystemParams, TraceOffset};
use stv_crypto::PublicCoin;
use stv_field::{FieldElement, ENCODED_LEN};

use crate::constraints::{ConstraintSystem, Oods};
use crate::error::VerifierError;

/// Public-input width: value word then index word.
pub const PUBLIC_INPUT_LEN: usize = 2 * ENCODED_LEN;

/// FRI layers fold at most this many bits each.
const MAX_FRI_STEP: u32 = 3;

/// Traces longer than `2^8` stop folding with `2^8` coefficients left.
const MAX_LAST_LAYER_LOG: u32 = 8;

const TRACE_COLUMNS: usize = 2;
const CONSTRAINTS: usize = 4;

/// Prover-chosen knobs that are not part of the public inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FibonacciConfig {
    /// Evaluation-domain expansion factor.
    pub blowup: u64,
    /// Proof-of-work difficulty.
    pub pow_bits: u8,
    /// Number of queries.
    pub queries: usize,
    /// Explicit FRI layout; derived from the trace length when absent.
    pub fri_layout: Option<Vec<u32>>,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            blowup: 16,
            pow_bits: 8,
            queries: 20,
            fri_layout: None,
        }
    }
}

/// Decoded public inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FibonacciClaim {
    /// Claimed element.
    pub value: FieldElement,
    /// Position of the claimed element.
    pub index: u64,
}

impl FibonacciClaim {
    /// Parse `value (32 bytes BE) || index (32-byte BE word)`.
    ///
    /// # Errors
    /// [`VerifierError::EmptyPublicInputs`] or [`VerifierError::PublicInputs`]
    /// for the wrong width, a non-canonical value or an index beyond `u64`.
    pub fn parse(public_inputs: &[u8]) -> Result<Self, VerifierError> {
        if public_inputs.is_empty() {
            return Err(VerifierError::EmptyPublicInputs);
        }
        if public_inputs.len() != PUBLIC_INPUT_LEN {
            return Err(VerifierError::PublicInputs(format!(
                "expected {PUBLIC_INPUT_LEN} bytes, got {}",
                public_inputs.len()
            )));
        }
        let (value, index) = public_inputs.split_at(ENCODED_LEN);
        let value = FieldElement::from_be_slice(value)
            .map_err(|e| VerifierError::PublicInputs(format!("value: {e}")))?;
        let (high, low) = index.split_at(ENCODED_LEN - 8);
        if high.iter().any(|&b| b != 0) {
            return Err(VerifierError::PublicInputs("index exceeds 64 bits".into()));
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(low);
        Ok(Self {
            value,
            index: u64::from_be_bytes(word),
        })
    }

    /// Wire encoding, inverse of [`parse`](Self::parse).
    #[must_use]
    pub fn to_public_inputs(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PUBLIC_INPUT_LEN);
        out.extend_from_slice(&self.value.to_be_bytes());
        out.extend_from_slice(&[0u8; ENCODED_LEN - 8]);
        out.extend_from_slice(&self.index.to_be_bytes());
        out
    }

    /// Trace rows needed to reach `index`.
    ///
    /// # Errors
    /// [`VerifierError::PublicInputs`] if the length overflows `u64`.
    pub fn trace_length(&self) -> Result<u64, VerifierError> {
        self.index
            .checked_add(1)
            .and_then(u64::checked_next_power_of_two)
            .map(|n| n.max(2))
            .ok_or_else(|| VerifierError::PublicInputs(format!("index {} too large", self.index)))
    }
}

/// Fold all of `log2 n` (or down to `2^8` coefficients for long traces) in
/// steps of three bits plus a remainder.
#[must_use]
pub fn default_fri_layout(trace_length: u64) -> Vec<u32> {
    let log_n = trace_length.trailing_zeros();
    let mut folds = if log_n <= MAX_LAST_LAYER_LOG {
        log_n
    } else {
        log_n - MAX_LAST_LAYER_LOG
    };
    let mut layout = Vec::new();
    while folds > 0 {
        let step = folds.min(MAX_FRI_STEP);
        layout.push(step);
        folds -= step;
    }
    layout
}

/// The Fibonacci constraint system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fibonacci {
    config: FibonacciConfig,
}

impl Fibonacci {
    /// Program with the given knobs.
    #[must_use]
    pub const fn new(config: FibonacciConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &FibonacciConfig {
        &self.config
    }

    /// Parameters for a trace of `trace_length` rows.
    #[must_use]
    pub fn params(&self, trace_length: u64) -> ConstraintSystemParams {
        ConstraintSystemParams {
            trace_columns: TRACE_COLUMNS,
            trace_length,
            constraints: CONSTRAINTS,
            blowup: self.config.blowup,
            constraint_degree: 1,
            pow_bits: self.config.pow_bits,
            queries: self.config.queries,
            fri_layout: self
                .config
                .fri_layout
                .clone()
                .unwrap_or_else(|| default_fri_layout(trace_length)),
            trace_layout: vec![
                TraceOffset::new(0, 0),
                TraceOffset::new(0, 1),
                TraceOffset::new(1, 0),
                TraceOffset::new(1, 1),
            ],
        }
    }
}

impl ConstraintSystem for Fibonacci {
    fn initialize(
        &self,
        public_inputs: &[u8],
    ) -> Result<(ConstraintSystemParams, PublicCoin), VerifierError> {
        let claim = FibonacciClaim::parse(public_inputs)?;
        let params = self.params(claim.trace_length()?);
        Ok((params, PublicCoin::new(public_inputs)))
    }

    fn combine(
        &self,
        public_inputs: &[u8],
        params: &ConstraintSystemParams,
        oods: &Oods<'_>,
        coefficients: &[FieldElement],
    ) -> Result<FieldElement, VerifierError> {
        let claim = FibonacciClaim::parse(public_inputs)?;
        let &[t0, t0_next, t1, t1_next] = oods.trace_values else {
            return Err(VerifierError::ShapeMismatch {
                what: "trace OODS values",
                expected: 4,
                got: oods.trace_values.len(),
            });
        };
        if coefficients.len() != 2 * CONSTRAINTS {
            return Err(VerifierError::ShapeMismatch {
                what: "constraint coefficients",
                expected: 2 * CONSTRAINTS,
                got: coefficients.len(),
            });
        }

        let n = params.trace_length;
        let omega = params.trace_generator()?;
        let z = oods.point;
        let one = FieldElement::ONE;

        let transition = (z - omega.pow_u64(n - 1)) * (z.pow_u64(n) - one).inverse()?;
        let quotients = [
            (t0_next - t1) * transition,
            (t1_next - t0 - t1) * transition,
            (t0 - one) * (z - one).inverse()?,
            (t0 - claim.value) * (z - omega.pow_u64(claim.index)).inverse()?,
        ];
        let adjustments = [z.pow_u64(n - 1), z.pow_u64(n - 1), z, z];

        Ok(quotients
            .iter()
            .zip(adjustments)
            .zip(coefficients.chunks_exact(2))
            .map(|((c, adj), pair)| (pair[0] + pair[1] * adj) * *c)
            .sum())
    }
}
