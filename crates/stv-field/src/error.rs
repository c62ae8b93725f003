//! Field-level failures.

use thiserror::Error;

/// Errors raised by field arithmetic and field-element decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Inverse of zero requested.
    #[error("division by zero")]
    DivisionByZero,
    /// Encoded integer is not below the modulus.
    #[error("value {0} is not a canonical field element")]
    NotCanonical(String),
    /// Malformed hex literal.
    #[error("invalid hex literal {0:?}")]
    InvalidHex(String),
    /// Byte string of the wrong width.
    #[error("expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required width.
        expected: usize,
        /// Observed width.
        got: usize,
    },
    /// No power-of-two subgroup of the requested size is available.
    #[error("no evaluation domain of size 2^{0}")]
    UnsupportedDomain(u32),
    /// Domain size that is not a power of two.
    #[error("domain size {0} is not a power of two")]
    NotPowerOfTwo(u64),
}
