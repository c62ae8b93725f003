//! Protocol parameters a constraint system derives from its public inputs.
//!
//! Everything the verifier sizes (domains, Merkle depths, transcript draws,
//! FRI layers) is a function of [`ConstraintSystemParams`], so the record is
//! validated once, up front, and trusted afterwards.

use serde::{Deserialize, Serialize};
use stv_field::{EvalDomain, FieldError, FieldElement};
use thiserror::Error;

/// Largest `log2` of the evaluation domain.
pub const MAX_LOG_EVAL_SIZE: u32 = 63;

/// A trace cell sampled out of domain: `T_column(ω^row · z)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraceOffset {
    /// Trace column.
    pub column: usize,
    /// Row offset relative to the sampled point.
    pub row: u64,
}

impl TraceOffset {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(column: usize, row: u64) -> Self {
        Self { column, row }
    }
}

/// Shape of one proof: trace geometry, soundness knobs and the FRI schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSystemParams {
    /// Number of trace columns.
    pub trace_columns: usize,
    /// Rows in the trace (power of two).
    pub trace_length: u64,
    /// Number of constraints (two combination coefficients each).
    pub constraints: usize,
    /// Evaluation-domain expansion factor (power of two).
    pub blowup: u64,
    /// Number of composition-polynomial columns.
    pub constraint_degree: usize,
    /// Proof-of-work difficulty in leading zero bits.
    pub pow_bits: u8,
    /// Number of distinct query indices.
    pub queries: usize,
    /// `log2` of the coset size folded away by each FRI layer.
    pub fri_layout: Vec<u32>,
    /// Trace cells opened at the out-of-domain point, in transcript order.
    pub trace_layout: Vec<TraceOffset>,
}

/// Inconsistent parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// A size that must be a power of two (at least 2) is not.
    #[error("{what} = {value} must be a power of two >= 2")]
    NotPowerOfTwo {
        /// Which field.
        what: &'static str,
        /// Offending value.
        value: u64,
    },
    /// A count that must be positive is zero.
    #[error("{0} must be non-zero")]
    Zero(&'static str),
    /// More queries than evaluation points.
    #[error("{queries} queries exceed the evaluation domain of {eval_size}")]
    TooManyQueries {
        /// Requested queries.
        queries: usize,
        /// Domain size.
        eval_size: u64,
    },
    /// FRI folds more than the trace degree allows.
    #[error("FRI layout folds 2^{folds}, trace length allows at most 2^{max}")]
    FriLayoutTooDeep {
        /// Sum of the layout.
        folds: u32,
        /// `log2(trace_length)`.
        max: u32,
    },
    /// A zero-width FRI step.
    #[error("FRI layout contains a zero step")]
    ZeroFriStep,
    /// Evaluation domain larger than supported.
    #[error("evaluation domain 2^{0} is too large")]
    DomainTooLarge(u32),
    /// Trace layout references a missing column or row.
    #[error("trace layout entry {entry:?} outside {columns} columns x {rows} rows")]
    TraceLayoutOutOfRange {
        /// Offending entry.
        entry: TraceOffset,
        /// Column count.
        columns: usize,
        /// Trace length.
        rows: u64,
    },
}

fn pow2(what: &'static str, value: u64) -> Result<(), ParamsError> {
    if value < 2 || !value.is_power_of_two() {
        return Err(ParamsError::NotPowerOfTwo { what, value });
    }
    Ok(())
}

impl ConstraintSystemParams {
    /// Check internal consistency.
    ///
    /// # Errors
    /// The first violated rule, as a [`ParamsError`].
    pub fn validate(&self) -> Result<(), ParamsError> {
        pow2("trace_length", self.trace_length)?;
        pow2("blowup", self.blowup)?;
        if self.trace_columns == 0 {
            return Err(ParamsError::Zero("trace_columns"));
        }
        if self.constraints == 0 {
            return Err(ParamsError::Zero("constraints"));
        }
        if self.constraint_degree == 0 {
            return Err(ParamsError::Zero("constraint_degree"));
        }
        if self.queries == 0 {
            return Err(ParamsError::Zero("queries"));
        }
        if self.fri_layout.is_empty() {
            return Err(ParamsError::Zero("fri_layout length"));
        }
        if self.trace_layout.is_empty() {
            return Err(ParamsError::Zero("trace_layout length"));
        }

        let log_eval = self.trace_length.trailing_zeros() + self.blowup.trailing_zeros();
        if log_eval > MAX_LOG_EVAL_SIZE {
            return Err(ParamsError::DomainTooLarge(log_eval));
        }
        if self.queries as u64 > self.eval_size() {
            return Err(ParamsError::TooManyQueries {
                queries: self.queries,
                eval_size: self.eval_size(),
            });
        }
        if self.fri_layout.contains(&0) {
            return Err(ParamsError::ZeroFriStep);
        }
        let folds = self.fri_folds();
        let max = self.trace_length.trailing_zeros();
        if folds > max {
            return Err(ParamsError::FriLayoutTooDeep { folds, max });
        }
        if let Some(entry) = self
            .trace_layout
            .iter()
            .find(|e| e.column >= self.trace_columns || e.row >= self.trace_length)
        {
            return Err(ParamsError::TraceLayoutOutOfRange {
                entry: *entry,
                columns: self.trace_columns,
                rows: self.trace_length,
            });
        }
        Ok(())
    }

    /// `trace_length · blowup`.
    #[must_use]
    pub const fn eval_size(&self) -> u64 {
        self.trace_length * self.blowup
    }

    /// `log2(eval_size)`.
    #[must_use]
    pub const fn log_eval_size(&self) -> u32 {
        self.eval_size().trailing_zeros()
    }

    /// Total `log2` reduction across all FRI layers, saturating at `u32::MAX`.
    #[must_use]
    pub fn fri_folds(&self) -> u32 {
        self.fri_layout
            .iter()
            .fold(0u32, |acc, &step| acc.saturating_add(step))
    }

    /// Size of the layer left after all folds.
    #[must_use]
    pub fn last_layer_size(&self) -> u64 {
        self.eval_size().checked_shr(self.fri_folds()).unwrap_or(0)
    }

    /// Coefficients the prover sends for the last layer.
    #[must_use]
    pub fn last_layer_degree_bound(&self) -> u64 {
        self.last_layer_size() / self.blowup
    }

    /// Number of out-of-domain coefficients drawn after the OODS values.
    #[must_use]
    pub fn oods_coefficient_count(&self) -> usize {
        self.trace_layout.len() + self.constraint_degree
    }

    /// The evaluation subgroup.
    ///
    /// # Errors
    /// [`FieldError::UnsupportedDomain`] if the size is out of range.
    pub fn eval_domain(&self) -> Result<EvalDomain, FieldError> {
        EvalDomain::new(self.log_eval_size())
    }

    /// Generator of the trace subgroup, `g^blowup` for the evaluation generator `g`.
    ///
    /// # Errors
    /// As [`eval_domain`](Self::eval_domain).
    pub fn trace_generator(&self) -> Result<FieldElement, FieldError> {
        Ok(self.eval_domain()?.generator.pow_u64(self.blowup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConstraintSystemParams {
        ConstraintSystemParams {
            trace_columns: 2,
            trace_length: 128,
            constraints: 4,
            blowup: 16,
            constraint_degree: 1,
            pow_bits: 8,
            queries: 20,
            fri_layout: vec![3, 3, 1],
            trace_layout: vec![TraceOffset::new(0, 0), TraceOffset::new(1, 1)],
        }
    }

    #[test]
    fn derived_sizes() {
        let p = sample();
        p.validate().unwrap();
        assert_eq!(p.eval_size(), 2048);
        assert_eq!(p.log_eval_size(), 11);
        assert_eq!(p.last_layer_size(), 16);
        assert_eq!(p.last_layer_degree_bound(), 1);
        assert_eq!(p.oods_coefficient_count(), 3);
    }

    #[test]
    fn trace_generator_has_trace_order() {
        let p = sample();
        let w = p.trace_generator().unwrap();
        assert_eq!(w.pow_u64(128), FieldElement::ONE);
        assert_ne!(w.pow_u64(64), FieldElement::ONE);
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut p = sample();
        p.blowup = 12;
        assert!(matches!(p.validate(), Err(ParamsError::NotPowerOfTwo { what: "blowup", .. })));

        let mut p = sample();
        p.fri_layout = vec![4, 4];
        assert!(matches!(p.validate(), Err(ParamsError::FriLayoutTooDeep { folds: 8, max: 7 })));

        let mut p = sample();
        p.queries = 4096;
        assert!(matches!(p.validate(), Err(ParamsError::TooManyQueries { .. })));

        let mut p = sample();
        p.trace_layout.push(TraceOffset::new(2, 0));
        assert!(matches!(p.validate(), Err(ParamsError::TraceLayoutOutOfRange { .. })));

        let mut p = sample();
        p.fri_layout = vec![3, 0];
        assert_eq!(p.validate(), Err(ParamsError::ZeroFriStep));

        let mut p = sample();
        p.fri_layout = vec![u32::MAX, 1];
        assert_eq!(p.fri_folds(), u32::MAX);
        assert_eq!(p.last_layer_size(), 0);
        assert!(matches!(
            p.validate(),
            Err(ParamsError::FriLayoutTooDeep { folds: u32::MAX, max: 7 })
        ));
    }
}
