// crates/stv-core/src/lib.rs

//! stv-core — the data model shared by the verifier crates.
//!
//! - [`ConstraintSystemParams`] / [`TraceOffset`]: per-proof protocol shape,
//!   validated before use.
//! - [`StarkProof`] / [`FriLayerProof`]: the untrusted proof record.
//! - [`io`]: JSON/CBOR/bincode proof files with extension auto-detection.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Small, explicit allowlist to keep docs readable and APIs ergonomic.
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// JSON/CBOR/bincode helpers and auto-detecting read/write APIs.
pub mod io;
/// Protocol parameters and their validation.
pub mod params;
/// The proof record.
pub mod proof;

pub use params::{ConstraintSystemParams, ParamsError, TraceOffset, MAX_LOG_EVAL_SIZE};
pub use proof::{FriLayerProof, ProofSummary, StarkProof};
