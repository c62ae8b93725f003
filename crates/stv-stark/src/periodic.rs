//! Periodic columns: public trace columns that repeat with a power-of-two period.
//!
//! A column with period `p` over a trace of length `n` is the polynomial `f` of
//! degree `< p` with `f(ω_p^r) = values[r]`, evaluated at a trace point `x` as
//! `f(x^(n/p))`. Constraint systems use it to fold round constants and
//! selectors into `combine` without committing them.

use stv_field::{poly, EvalDomain, FieldElement, FieldError};

/// A periodic column in coefficient form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicColumn {
    coefficients: Vec<FieldElement>,
}

impl PeriodicColumn {
    /// Wrap coefficients directly; the period is their count.
    ///
    /// # Errors
    /// [`FieldError::NotPowerOfTwo`] unless the count is a power of two.
    pub fn new(coefficients: Vec<FieldElement>) -> Result<Self, FieldError> {
        let period = coefficients.len() as u64;
        if !period.is_power_of_two() {
            return Err(FieldError::NotPowerOfTwo(period));
        }
        Ok(Self { coefficients })
    }

    /// Interpolate one period of values (natural order over `ω_p`).
    ///
    /// # Errors
    /// [`FieldError::NotPowerOfTwo`] unless `values.len()` is a power of two.
    pub fn from_values(values: &[FieldElement]) -> Result<Self, FieldError> {
        let period = values.len() as u64;
        if !period.is_power_of_two() {
            return Err(FieldError::NotPowerOfTwo(period));
        }
        if period == 1 {
            return Self::new(values.to_vec());
        }
        let domain = EvalDomain::with_size(period)?;
        let scale = FieldElement::from(period).inverse()?;
        // c_k = (1/p) Σ_r v_r ω^(-rk)
        let coefficients = (0..period)
            .map(|k| {
                let acc: FieldElement = values
                    .iter()
                    .zip(0u64..)
                    .map(|(v, r)| *v * domain.inverse_element(r * k % period))
                    .sum();
                acc * scale
            })
            .collect();
        Self::new(coefficients)
    }

    /// Number of rows after which the column repeats.
    #[must_use]
    pub fn period(&self) -> usize {
        self.coefficients.len()
    }

    /// Coefficients, lowest degree first.
    #[must_use]
    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    /// Value at the trace point `x` of a trace with `trace_length` rows.
    ///
    /// # Errors
    /// [`FieldError::NotPowerOfTwo`] when the trace is shorter than the period
    /// or not a power of two.
    pub fn evaluate(&self, x: &FieldElement, trace_length: u64) -> Result<FieldElement, FieldError> {
        let period = self.period() as u64;
        if !trace_length.is_power_of_two() || trace_length < period {
            return Err(FieldError::NotPowerOfTwo(trace_length));
        }
        Ok(poly::evaluate(&self.coefficients, &x.pow_u64(trace_length / period)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_values_over_the_trace() {
        let values: Vec<FieldElement> = [5u64, 9, 11, 0].iter().map(|&v| v.into()).collect();
        let column = PeriodicColumn::from_values(&values).unwrap();
        assert_eq!(column.period(), 4);
        let trace = EvalDomain::new(5).unwrap();
        for r in 0..32 {
            let got = column.evaluate(&trace.element(r), 32).unwrap();
            assert_eq!(got, values[(r % 4) as usize], "row {r}");
        }
    }

    #[test]
    fn constant_column() {
        let c = FieldElement::from(7u64);
        let column = PeriodicColumn::from_values(&[c]).unwrap();
        assert_eq!(column.evaluate(&FieldElement::from(123u64), 8).unwrap(), c);
    }

    #[test]
    fn rejects_odd_periods() {
        assert!(PeriodicColumn::new(vec![FieldElement::ONE; 3]).is_err());
        assert!(PeriodicColumn::from_values(&[]).is_err());
        let column = PeriodicColumn::new(vec![FieldElement::ONE; 4]).unwrap();
        assert!(column.evaluate(&FieldElement::ONE, 2).is_err());
    }
}
