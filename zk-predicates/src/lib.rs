//! ZK layer for the private eligibility checks demo.
//!
//! This crate contains:
//! - SNARK circuits for the three eligibility predicates (age, country, salary).
//! - Prover + verifier orchestration.
//! - Input parsing and the text transport format for moving proofs between
//!   the prover and verifier surfaces.

pub mod constants;
pub mod circuit;
pub mod groth16;
pub mod transport;
pub mod types;
