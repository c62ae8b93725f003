//! Known-answer vectors and algebraic laws for the prime field.
//!
//! The constants were cross-checked against an independent big-integer
//! implementation of `P = 2^251 + 17·2^192 + 1`.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use stv_field::{EvalDomain, FieldElement, FieldError, U256, MODULUS};

fn fe(s: &str) -> FieldElement {
    FieldElement::from_hex(s).unwrap()
}

const A: &str = "0x0326c9b26c9b26d064d9364d9364d9364d9364d9364d9364d9364d9364d9364e";

#[test]
fn addition_vector() {
    assert_eq!(
        fe(A) + fe(A),
        fe("0x064d9364d9364da0c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9c")
    );
}

#[test]
fn multiplication_vector() {
    assert_eq!(
        fe(A) * fe(A),
        fe("0x05abd7910b0c75960ad04776b6e406950a1bbd3ce29d8096733030e56fa97dc5")
    );
    assert_eq!(FieldElement::from(0x21u64).square(), FieldElement::from(0x441u64));
}

#[test]
fn subtraction_and_negation_vectors() {
    assert_eq!(
        -fe(A),
        fe("0x04d9364d9364d9409b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9b3")
    );
    assert_eq!(
        FieldElement::from(0x21u64) - fe(A),
        fe("0x04d9364d9364d9409b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9b26c9d4")
    );
}

#[test]
fn inverse_vector() {
    assert_eq!(FieldElement::from(0x21u64).inverse().unwrap(), fe(A));
}

#[test]
fn exponentiation_vector() {
    let g = fe("0x0393a32b34832dbad650df250f673d7c5edd09f076fc314a3e5a42f0606082e1");
    assert_eq!(
        g.pow_u64(13825),
        fe("0x07b29494e473ce930b6238d02250fdbde4f31c35b05d1e7026e082c068ece7e7")
    );
}

#[test]
fn domain_generator_vector() {
    let d = EvalDomain::new(14).unwrap();
    assert_eq!(d.size, 16384);
    assert_eq!(
        d.generator,
        fe("0x0393a32b34832dbad650df250f673d7c5edd09f076fc314a3e5a42f0606082e1")
    );
}

#[test]
fn zero_has_no_inverse() {
    assert_eq!(FieldElement::ZERO.inverse(), Err(FieldError::DivisionByZero));
}

#[test]
fn modulus_is_rejected_but_modulus_minus_one_is_not() {
    assert!(FieldElement::from_be_bytes(&MODULUS.to_be_bytes()).is_err());
    let pm1 = MODULUS.overflowing_sub(&U256::ONE).0;
    assert!(FieldElement::from_be_bytes(&pm1.to_be_bytes()).is_ok());
}

fn arb_fe() -> impl Strategy<Value = FieldElement> {
    any::<[u8; 32]>().prop_map(|mut b| {
        // Clearing the top five bits keeps the integer below 2^251 < P.
        b[0] &= 0x07;
        FieldElement::from_be_bytes(&b).unwrap()
    })
}

proptest! {
    #[test]
    fn inverse_is_two_sided(a in arb_fe()) {
        prop_assume!(!a.is_zero());
        let inv = a.inverse().unwrap();
        prop_assert_eq!(a * inv, FieldElement::ONE);
        prop_assert_eq!(inv * a, FieldElement::ONE);
    }

    #[test]
    fn pow_zero_is_one(a in arb_fe()) {
        prop_assert_eq!(a.pow_u64(0), FieldElement::ONE);
    }

    #[test]
    fn distributivity(a in arb_fe(), b in arb_fe(), c in arb_fe()) {
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }

    #[test]
    fn sub_undoes_add(a in arb_fe(), b in arb_fe()) {
        prop_assert_eq!((a + b) - b, a);
        prop_assert_eq!(a + (-a), FieldElement::ZERO);
    }

    #[test]
    fn pow_adds_exponents(a in arb_fe(), e1 in 0u64..1_000, e2 in 0u64..1_000) {
        prop_assert_eq!(a.pow_u64(e1) * a.pow_u64(e2), a.pow_u64(e1 + e2));
    }

    #[test]
    fn bytes_roundtrip(a in arb_fe()) {
        prop_assert_eq!(FieldElement::from_be_bytes(&a.to_be_bytes()).unwrap(), a);
    }
}
