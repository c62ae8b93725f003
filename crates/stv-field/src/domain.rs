//! Power-of-two evaluation domains.
//!
//! `P - 1 = 2^192 · (2^59 + 17)`, so subgroups of every size `2^k` with
//! `k <= 192` exist. We take the multiplicative generator `3` and set
//! `ω_k = 3^((P-1) >> k)`, which has exact order `2^k`. Domain sizes are
//! indexed by `u64`, which caps `k` at 63.

use serde::{Deserialize, Serialize};

use crate::field::MODULUS;
use crate::{FieldElement, FieldError, U256};

/// Largest supported `log2` of a domain size.
pub const MAX_LOG_SIZE: u32 = 63;

/// A multiplicative subgroup of size `2^log_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalDomain {
    /// Generator of the subgroup (a primitive `size`-th root of unity).
    pub generator: FieldElement,
    /// `log2(size)`.
    pub log_size: u32,
    /// Number of elements.
    pub size: u64,
}

impl EvalDomain {
    /// Subgroup of size `2^log_size`, `1 <= log_size <= 63`.
    ///
    /// # Errors
    /// [`FieldError::UnsupportedDomain`] outside that range.
    pub fn new(log_size: u32) -> Result<Self, FieldError> {
        if log_size == 0 || log_size > MAX_LOG_SIZE {
            return Err(FieldError::UnsupportedDomain(log_size));
        }
        let exp = MODULUS.overflowing_sub(&U256::ONE).0.shr(log_size);
        let generator = FieldElement::generator().pow(&exp);

        debug_assert_eq!(
            generator.pow_u64(1u64 << log_size),
            FieldElement::ONE,
            "ω^(2^k) should be 1"
        );
        debug_assert_ne!(
            generator.pow_u64(1u64 << (log_size - 1)),
            FieldElement::ONE,
            "ω should have exact order 2^k"
        );

        Ok(Self {
            generator,
            log_size,
            size: 1u64 << log_size,
        })
    }

    /// Subgroup of exactly `size` elements.
    ///
    /// # Errors
    /// [`FieldError::NotPowerOfTwo`], or [`FieldError::UnsupportedDomain`] for `size = 1`.
    pub fn with_size(size: u64) -> Result<Self, FieldError> {
        if !size.is_power_of_two() {
            return Err(FieldError::NotPowerOfTwo(size));
        }
        Self::new(size.trailing_zeros())
    }

    /// The `i`-th element `ω^i`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: u64) -> FieldElement {
        self.generator.pow_u64(i % self.size)
    }

    /// `ω^{-i}` without a field inversion.
    #[inline]
    #[must_use]
    pub fn inverse_element(&self, i: u64) -> FieldElement {
        self.element(self.size - i % self.size)
    }

    /// Element at position `i` of the bit-reversed enumeration.
    #[inline]
    #[must_use]
    pub fn bit_reversed_element(&self, i: u64) -> FieldElement {
        self.element(bit_reverse(i, self.log_size))
    }
}

/// Reverse the low `bits` bits of `i` (higher bits are discarded).
#[inline]
#[must_use]
pub const fn bit_reverse(i: u64, bits: u32) -> u64 {
    if bits == 0 {
        return 0;
    }
    i.reverse_bits() >> (u64::BITS - bits)
}
