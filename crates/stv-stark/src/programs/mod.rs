//! Concrete [`ConstraintSystem`](crate::ConstraintSystem) implementations.

pub mod fibonacci;

pub use fibonacci::{default_fri_layout, Fibonacci, FibonacciClaim, FibonacciConfig};
