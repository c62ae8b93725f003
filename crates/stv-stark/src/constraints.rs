//! The per-program capability the verifier consumes.
//!
//! A [`ConstraintSystem`] turns public inputs into parameters and a seeded
//! coin, recombines the out-of-domain trace values into the composition
//! polynomial's value, and (by default) evaluates the DEEP composition at the
//! queried evaluation points to seed the first FRI layer. Implementations are
//! pure functions of their arguments.

use stv_core::ConstraintSystemParams;
use stv_crypto::PublicCoin;
use stv_field::FieldElement;

use crate::error::VerifierError;

/// Out-of-domain sample: the point and the values the prover claims there.
#[derive(Clone, Copy, Debug)]
pub struct Oods<'a> {
    /// The sampled point `z`.
    pub point: FieldElement,
    /// `T_col(ω^row · z)` for each trace-layout entry, in layout order.
    pub trace_values: &'a [FieldElement],
    /// Composition columns evaluated at `z^D`.
    pub constraint_values: &'a [FieldElement],
}

/// Program-specific algebra consumed by the verifier.
pub trait ConstraintSystem {
    /// Derive parameters and the seeded transcript from public inputs.
    ///
    /// # Errors
    /// [`VerifierError::PublicInputs`] when the inputs do not decode.
    fn initialize(
        &self,
        public_inputs: &[u8],
    ) -> Result<(ConstraintSystemParams, PublicCoin), VerifierError>;

    /// Random linear combination of all constraints at `oods.point`, using
    /// `coefficients` (two per constraint).
    ///
    /// # Errors
    /// Shape mismatches or an arithmetic fault.
    fn combine(
        &self,
        public_inputs: &[u8],
        params: &ConstraintSystemParams,
        oods: &Oods<'_>,
        coefficients: &[FieldElement],
    ) -> Result<FieldElement, VerifierError>;

    /// First-layer FRI values at the sorted `queries`.
    ///
    /// # Errors
    /// Shape mismatches or an arithmetic fault.
    fn evaluate_at_queries(
        &self,
        params: &ConstraintSystemParams,
        queries: &[u64],
        trace_rows: &[Vec<FieldElement>],
        constraint_rows: &[Vec<FieldElement>],
        oods: &Oods<'_>,
        coefficients: &[FieldElement],
    ) -> Result<Vec<FieldElement>, VerifierError> {
        deep_composition(params, queries, trace_rows, constraint_rows, oods, coefficients)
    }
}

fn expect_len(what: &'static str, expected: usize, got: usize) -> Result<(), VerifierError> {
    if expected == got {
        Ok(())
    } else {
        Err(VerifierError::ShapeMismatch {
            what,
            expected,
            got,
        })
    }
}

/// DEEP composition at each queried point.
///
/// For query `q` the evaluation point is `x = 3 · g^bitrev(q)` on the shifted
/// evaluation coset and
///
/// `v = Σ_j c_j (T_{col_j}(x) − t_j) / (x − ω^{row_j} z) + Σ_i c_{m+i} (A_i(x) − a_i) / (x − z^D)`
///
/// where `m` is the trace-layout length and `D` the constraint degree.
///
/// # Errors
/// Shape mismatches, or [`VerifierError::Arithmetic`] if a denominator vanishes.
pub fn deep_composition(
    params: &ConstraintSystemParams,
    queries: &[u64],
    trace_rows: &[Vec<FieldElement>],
    constraint_rows: &[Vec<FieldElement>],
    oods: &Oods<'_>,
    coefficients: &[FieldElement],
) -> Result<Vec<FieldElement>, VerifierError> {
    let m = params.trace_layout.len();
    let d = params.constraint_degree;
    expect_len("trace OODS values", m, oods.trace_values.len())?;
    expect_len("constraint OODS values", d, oods.constraint_values.len())?;
    expect_len("OODS coefficients", m + d, coefficients.len())?;
    expect_len("trace rows", queries.len(), trace_rows.len())?;
    expect_len("constraint rows", queries.len(), constraint_rows.len())?;

    let domain = params.eval_domain()?;
    let trace_generator = params.trace_generator()?;
    let shift = FieldElement::generator();
    let z = oods.point;
    let shifted_points: Vec<FieldElement> = params
        .trace_layout
        .iter()
        .map(|o| trace_generator.pow_u64(o.row) * z)
        .collect();
    let z_d = z.pow_u64(d as u64);
    let (trace_coefficients, constraint_coefficients) = coefficients.split_at(m);

    let mut out = Vec::with_capacity(queries.len());
    for ((&q, trace_row), constraint_row) in queries.iter().zip(trace_rows).zip(constraint_rows) {
        expect_len("trace row", params.trace_columns, trace_row.len())?;
        expect_len("constraint row", d, constraint_row.len())?;
        let x = shift * domain.bit_reversed_element(q);

        let mut acc = FieldElement::ZERO;
        for (((offset, point), t), c) in params
            .trace_layout
            .iter()
            .zip(&shifted_points)
            .zip(oods.trace_values)
            .zip(trace_coefficients)
        {
            acc += *c * (trace_row[offset.column] - *t) * (x - *point).inverse()?;
        }
        let denominator = (x - z_d).inverse()?;
        for ((value, a), c) in constraint_row
            .iter()
            .zip(oods.constraint_values)
            .zip(constraint_coefficients)
        {
            acc += *c * (*value - *a) * denominator;
        }
        out.push(acc);
    }
    Ok(out)
}
