// crates/stv-stark/src/lib.rs

//! STARK proof verification.
//!
//! [`verify`] checks a [`StarkProof`](stv_core::StarkProof) against a
//! [`ConstraintSystem`]: it replays the Fiat–Shamir transcript, checks the
//! out-of-domain constraint identity, the proof of work, the trace and
//! composition decommitments, and every FRI layer down to the last-layer
//! polynomial. Programs live under [`programs`]; [`Fibonacci`] is built in.
//!
//! Well-formed but invalid proofs are *rejected* ([`Verdict::Rejected`]);
//! malformed input is an *error* ([`VerifierError`]).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod constraints;
mod error;
pub mod fri;
pub mod periodic;
pub mod programs;
mod verifier;

pub use constraints::{deep_composition, ConstraintSystem, Oods};
pub use error::{Rejection, Verdict, VerifierError};
pub use fri::{fold_coset, FriLayer};
pub use periodic::PeriodicColumn;
pub use programs::{Fibonacci, FibonacciClaim, FibonacciConfig};
pub use verifier::{verify, verify_proof};
