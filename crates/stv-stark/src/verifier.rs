//! The verification state machine.
//!
//! One call to [`verify`] replays the prover's transcript on a fresh coin:
//! commitments, out-of-domain sampling, FRI challenges, proof of work and
//! queries, in that order. The checks then run against the derived
//! challenges. The first failed check becomes the [`Verdict`]; malformed
//! input aborts with a [`VerifierError`] instead.

use std::collections::BTreeMap;

use stv_core::{ConstraintSystemParams, StarkProof};
use stv_crypto::ProofOfWork;
use stv_field::{poly, FieldElement};
use tracing::{debug, info};

use crate::constraints::{ConstraintSystem, Oods};
use crate::error::{Rejection, Verdict, VerifierError};
use crate::fri::{last_layer_mismatch, FriLayer};

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

/// Length checks that only depend on the parameters.
fn check_shapes(proof: &StarkProof, params: &ConstraintSystemParams) -> Result<(), VerifierError> {
    expect_len(
        "trace OODS values",
        params.trace_layout.len(),
        proof.trace_oods_values.len(),
    )?;
    expect_len(
        "constraint OODS values",
        params.constraint_degree,
        proof.constraint_oods_values.len(),
    )?;
    expect_len("FRI layers", params.fri_layout.len(), proof.fri_layers.len())?;
    let last = usize::try_from(params.last_layer_degree_bound()).unwrap_or(usize::MAX);
    expect_len(
        "last layer coefficients",
        last,
        proof.last_layer_coefficients.len(),
    )
}

/// Opened rows must line up with the queries and have the committed width.
fn check_rows(
    proof: &StarkProof,
    params: &ConstraintSystemParams,
    queries: usize,
) -> Result<(), VerifierError> {
    expect_len("trace rows", queries, proof.trace_values.len())?;
    expect_len("constraint rows", queries, proof.constraint_values.len())?;
    for row in &proof.trace_values {
        expect_len("trace row", params.trace_columns, row.len())?;
    }
    for row in &proof.constraint_values {
        expect_len("constraint row", params.constraint_degree, row.len())?;
    }
    Ok(())
}

/// Assemble the cosets a FRI layer needs.
///
/// `known` holds the previous layer's values by index. Members of a touched
/// coset that are not known come, in order, from `supplied`; every supplied
/// value must be consumed.
fn gather_cosets(
    known: &BTreeMap<u64, FieldElement>,
    step_bits: u32,
    supplied: &[FieldElement],
    layer: usize,
) -> Result<(Vec<u64>, Vec<Vec<FieldElement>>), VerifierError> {
    let coset_size = 1u64 << step_bits;
    let mut supplied = supplied.iter();
    let mut known = known.iter().peekable();
    let mut indices = Vec::new();
    let mut cosets = Vec::new();

    while let Some(&(&first, _)) = known.peek() {
        let coset_index = first >> step_bits;
        let start = coset_index << step_bits;
        let mut members = Vec::with_capacity(usize::try_from(coset_size).unwrap_or(0));
        for position in start..start + coset_size {
            let value = match known.peek() {
                Some(&(&i, &v)) if i == position => {
                    let _ = known.next();
                    v
                }
                _ => *supplied
                    .next()
                    .ok_or(VerifierError::MissingFriValues { layer })?,
            };
            members.push(value);
        }
        indices.push(coset_index);
        cosets.push(members);
    }

    let extra = supplied.len();
    if extra > 0 {
        return Err(VerifierError::UnusedFriValues { layer, extra });
    }
    Ok((indices, cosets))
}

fn reject(reason: Rejection) -> Verdict {
    info!(%reason, "proof rejected");
    Verdict::Rejected(reason)
}

/// Verify `proof` against the program described by `cs`.
///
/// Returns `Ok(Verdict::Accepted)` when every check passes and
/// `Ok(Verdict::Rejected(_))` with the first failed check otherwise. The proof
/// is never mutated.
///
/// # Errors
/// [`VerifierError`] for malformed input: empty or undecodable public inputs,
/// invalid parameters, components of the wrong length, or an arithmetic fault.
pub fn verify<C: ConstraintSystem + ?Sized>(
    proof: &StarkProof,
    cs: &C,
) -> Result<Verdict, VerifierError> {
    if proof.public_inputs.is_empty() {
        return Err(VerifierError::EmptyPublicInputs);
    }

    // ---- Parameters and shape ------------------------------------------------
    let (params, mut coin) = cs.initialize(&proof.public_inputs)?;
    params.validate()?;
    check_shapes(proof, &params)?;
    let domain = params.eval_domain()?;
    debug!(
        trace_length = params.trace_length,
        eval_size = domain.size,
        fri_layout = ?params.fri_layout,
        queries = params.queries,
        "parameters derived"
    );

    // ---- Commitments -----------------------------------------------------------
    coin.write_digest(&proof.trace_root);
    let constraint_coefficients = coin.read_field_elements(2 * params.constraints);
    coin.write_digest(&proof.constraint_root);

    // ---- Out-of-domain sampling -----------------------------------------------
    let oods_point = coin.read_field();
    coin.write_field_elements(&proof.trace_oods_values);
    coin.write_field_elements(&proof.constraint_oods_values);
    let oods_coefficients = coin.read_field_elements(params.oods_coefficient_count());
    let oods = Oods {
        point: oods_point,
        trace_values: &proof.trace_oods_values,
        constraint_values: &proof.constraint_oods_values,
    };
    debug!(%oods_point, "out-of-domain point drawn");

    let combined = cs.combine(&proof.public_inputs, &params, &oods, &constraint_coefficients)?;
    if combined != poly::evaluate(&proof.constraint_oods_values, &oods_point) {
        return Ok(reject(Rejection::ConstraintMismatch));
    }
    debug!("out-of-domain constraint check passed");

    // ---- FRI challenges, proof of work, queries --------------------------------
    let eval_points: Vec<FieldElement> = proof
        .fri_layers
        .iter()
        .map(|layer| {
            coin.write_digest(&layer.root);
            coin.read_field()
        })
        .collect();
    coin.write_field_elements(&proof.last_layer_coefficients);

    let pow = ProofOfWork::new(&coin.digest(), params.pow_bits);
    coin.write(&proof.pow_nonce.to_be_bytes());
    let queries = coin.read_queries(params.queries, domain.log_size)?;
    if !pow.check(proof.pow_nonce) {
        return Ok(reject(Rejection::ProofOfWork));
    }
    debug!(bits = params.pow_bits, queries = queries.len(), "proof of work accepted");

    // ---- Trace and composition decommitments ------------------------------------
    check_rows(proof, &params, queries.len())?;
    if !stv_merkle::verify(
        &proof.trace_root,
        domain.log_size,
        &queries,
        &proof.trace_values,
        &proof.trace_decommitment,
    )? {
        return Ok(reject(Rejection::TraceDecommitment));
    }
    if !stv_merkle::verify(
        &proof.constraint_root,
        domain.log_size,
        &queries,
        &proof.constraint_values,
        &proof.constraint_decommitment,
    )? {
        return Ok(reject(Rejection::ConstraintDecommitment));
    }
    debug!("trace and constraint decommitments verified");

    // ---- FRI ---------------------------------------------------------------------
    let first_layer = cs.evaluate_at_queries(
        &params,
        &queries,
        &proof.trace_values,
        &proof.constraint_values,
        &oods,
        &oods_coefficients,
    )?;
    expect_len("first FRI layer values", queries.len(), first_layer.len())?;
    let mut known: BTreeMap<u64, FieldElement> = queries.iter().copied().zip(first_layer).collect();

    let mut layer_len = domain.size;
    for (layer_index, ((layer, &step_bits), &eval_point)) in proof
        .fri_layers
        .iter()
        .zip(&params.fri_layout)
        .zip(&eval_points)
        .enumerate()
    {
        let (coset_indices, cosets) = gather_cosets(&known, step_bits, &layer.values, layer_index)?;
        let depth = layer_len.trailing_zeros() - step_bits;
        if !stv_merkle::verify(&layer.root, depth, &coset_indices, &cosets, &layer.decommitment)? {
            return Ok(reject(Rejection::FriDecommitment { layer: layer_index }));
        }

        let fri = FriLayer {
            eval_point,
            coset_size: 1u64 << step_bits,
            layer_len,
            domain,
        };
        known = coset_indices
            .iter()
            .zip(&cosets)
            .map(|(&index, values)| fri.fold(index, values).map(|v| (index, v)))
            .collect::<Result<_, _>>()?;
        layer_len >>= step_bits;
        debug!(layer = layer_index, cosets = coset_indices.len(), layer_len, "FRI layer folded");
    }

    // ---- Last layer ------------------------------------------------------------------
    if let Some(index) = last_layer_mismatch(&known, &proof.last_layer_coefficients, layer_len, &domain) {
        return Ok(reject(Rejection::LastLayer { index }));
    }

    info!(trace_length = params.trace_length, "proof accepted");
    Ok(Verdict::Accepted)
}

/// [`verify`] collapsed to a boolean: `true` only for an accepted proof.
///
/// # Errors
/// As [`verify`].
pub fn verify_proof<C: ConstraintSystem + ?Sized>(
    proof: &StarkProof,
    cs: &C,
) -> Result<bool, VerifierError> {
    Ok(verify(proof, cs)?.is_accepted())
}
