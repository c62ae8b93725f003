//! Dense univariate polynomials.

use serde::{Deserialize, Serialize};

use crate::FieldElement;

/// Coefficients in increasing degree order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial(Vec<FieldElement>);

impl Polynomial {
    /// Wrap a coefficient vector (`coefficients[i]` multiplies `x^i`).
    #[must_use]
    pub fn new(coefficients: Vec<FieldElement>) -> Self {
        Self(coefficients)
    }

    /// Borrow the coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[FieldElement] {
        &self.0
    }

    /// Number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the empty (zero) polynomial.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Horner evaluation. The empty polynomial evaluates to zero.
    #[must_use]
    pub fn evaluate(&self, x: &FieldElement) -> FieldElement {
        evaluate(&self.0, x)
    }
}

/// Horner evaluation over a borrowed coefficient slice.
#[must_use]
pub fn evaluate(coefficients: &[FieldElement], x: &FieldElement) -> FieldElement {
    coefficients
        .iter()
        .rev()
        .fold(FieldElement::ZERO, |acc, c| acc * *x + *c)
}
