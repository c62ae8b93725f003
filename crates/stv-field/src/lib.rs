// crates/stv-field/src/lib.rs

//! Prime field arithmetic for the STARK verifier.
//!
//! - [`FieldElement`]: integers modulo `P = 2^251 + 17·2^192 + 1`, Montgomery
//!   backed, canonical big-endian on the wire.
//! - [`U256`]: the limb type underneath, also used for exponents.
//! - [`EvalDomain`]: power-of-two multiplicative subgroups and [`bit_reverse`].
//! - [`Polynomial`]: dense coefficients with Horner evaluation.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]

pub mod domain;
mod error;
pub mod field;
pub mod poly;
mod u256;

pub use domain::{bit_reverse, EvalDomain};
pub use error::FieldError;
pub use field::{FieldElement, ENCODED_LEN, MODULUS};
pub use poly::Polynomial;
pub use u256::U256;
