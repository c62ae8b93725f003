//! FRI verifier side: coset folding and the last-layer check.
//!
//! Layers are stored in bit-reversed order, so positions `2k` and `2k + 1` of a
//! layer of length `len` hold the evaluations at `±x` with
//! `x = g^(bitrev(k, log2(len/2)) · step)` and `step = |domain| / len`.
//! Folding a pair with challenge `β` gives
//!
//! `(a + b) + β · x⁻¹ · (a − b)`
//!
//! and a coset of `2^s` values is folded `s` times, squaring `β` and halving the
//! layer each time.

use std::collections::BTreeMap;

use stv_field::{bit_reverse, poly, EvalDomain, FieldElement};

use crate::error::VerifierError;

/// Layer-wide folding parameters.
#[derive(Clone, Copy, Debug)]
pub struct FriLayer {
    /// Folding challenge for this layer.
    pub eval_point: FieldElement,
    /// Number of values per coset (`2^layout[k]`).
    pub coset_size: u64,
    /// Number of evaluations in the layer.
    pub layer_len: u64,
    /// The full evaluation subgroup.
    pub domain: EvalDomain,
}

impl FriLayer {
    /// Fold the coset at `coset_index` down to one value.
    ///
    /// # Errors
    /// [`VerifierError::InvalidCoset`] when `values` does not match the layer's
    /// coset size or the coset falls outside the layer.
    pub fn fold(&self, coset_index: u64, values: &[FieldElement]) -> Result<FieldElement, VerifierError> {
        if values.len() as u64 != self.coset_size {
            return Err(VerifierError::InvalidCoset {
                coset_index,
                coset_size: values.len(),
                layer_len: self.layer_len,
            });
        }
        fold_coset(values, &self.eval_point, coset_index, self.layer_len, &self.domain)
    }
}

/// Fold one coset of a layer of length `layer_len` over `domain`.
///
/// # Errors
/// [`VerifierError::InvalidCoset`] if `values` is empty or not a power of two in
/// length, if `layer_len` is not a power of two no larger than the domain, or
/// if the coset does not lie inside the layer.
pub fn fold_coset(
    values: &[FieldElement],
    eval_point: &FieldElement,
    coset_index: u64,
    layer_len: u64,
    domain: &EvalDomain,
) -> Result<FieldElement, VerifierError> {
    let coset_size = values.len() as u64;
    let fits = coset_size.is_power_of_two()
        && layer_len.is_power_of_two()
        && layer_len <= domain.size
        && coset_size <= layer_len
        && coset_index < layer_len / coset_size;
    if !fits {
        return Err(VerifierError::InvalidCoset {
            coset_index,
            coset_size: values.len(),
            layer_len,
        });
    }

    let mut layer = values.to_vec();
    let mut len = layer_len;
    let mut index = coset_index * (coset_size / 2);
    let mut step = domain.size / layer_len;
    let mut beta = *eval_point;
    while layer.len() > 1 {
        let bits = (len / 2).trailing_zeros();
        layer = layer
            .chunks_exact(2)
            .zip(index..)
            .map(|(pair, position)| {
                let x_inv = domain.inverse_element(bit_reverse(position, bits) * step);
                (pair[0] + pair[1]) + beta * x_inv * (pair[0] - pair[1])
            })
            .collect();
        len /= 2;
        index /= 2;
        step *= 2;
        beta = beta.square();
    }
    Ok(layer[0])
}

/// Compare folded values against the last-layer polynomial.
///
/// `folded` maps indices of the final layer (length `layer_len`, bit-reversed
/// order) to the values obtained by folding. Returns the first index whose
/// value disagrees with `coefficients` evaluated at `ω_L^bitrev(i)`.
#[must_use]
pub fn last_layer_mismatch(
    folded: &BTreeMap<u64, FieldElement>,
    coefficients: &[FieldElement],
    layer_len: u64,
    domain: &EvalDomain,
) -> Option<u64> {
    let root = domain.generator.pow_u64(domain.size / layer_len);
    let bits = layer_len.trailing_zeros();
    folded.iter().find_map(|(&i, value)| {
        let x = root.pow_u64(bit_reverse(i, bits));
        (poly::evaluate(coefficients, &x) != *value).then_some(i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(s: &str) -> FieldElement {
        FieldElement::from_hex(s).unwrap()
    }

    #[test]
    fn single_value_coset_is_returned_unchanged() {
        let d = EvalDomain::new(4).unwrap();
        let v = fe("0x1234");
        assert_eq!(fold_coset(&[v], &FieldElement::ONE, 3, 16, &d).unwrap(), v);
    }

    #[test]
    fn ill_fitting_cosets_are_rejected() {
        let d = EvalDomain::new(4).unwrap();
        let vals = [FieldElement::ONE; 4];
        assert!(fold_coset(&vals, &FieldElement::ONE, 4, 16, &d).is_err());
        assert!(fold_coset(&vals[..3], &FieldElement::ONE, 0, 16, &d).is_err());
        assert!(fold_coset(&vals, &FieldElement::ONE, 0, 32, &d).is_err());
        assert!(fold_coset(&[], &FieldElement::ONE, 0, 16, &d).is_err());
    }

    #[test]
    fn constant_layer_folds_to_scaled_constant() {
        // a = b: the odd part vanishes and each level doubles the value.
        let d = EvalDomain::new(6).unwrap();
        let c = fe("0x77");
        let out = fold_coset(&[c; 8], &fe("0x1234567"), 5, 64, &d).unwrap();
        assert_eq!(out, c * FieldElement::from(8u64));
    }

    #[test]
    fn layer_wrapper_checks_coset_width() {
        let layer = FriLayer {
            eval_point: FieldElement::ONE,
            coset_size: 4,
            layer_len: 16,
            domain: EvalDomain::new(4).unwrap(),
        };
        assert!(layer.fold(0, &[FieldElement::ONE; 2]).is_err());
        assert!(layer.fold(0, &[FieldElement::ONE; 4]).is_ok());
    }

    #[test]
    fn last_layer_of_constant_polynomial() {
        let d = EvalDomain::new(5).unwrap();
        let c = fe("0x99");
        let mut folded: BTreeMap<u64, FieldElement> = (0..4).map(|i| (i, c)).collect();
        assert_eq!(last_layer_mismatch(&folded, &[c], 4, &d), None);
        folded.insert(2, c + FieldElement::ONE);
        assert_eq!(last_layer_mismatch(&folded, &[c], 4, &d), Some(2));
    }
}
