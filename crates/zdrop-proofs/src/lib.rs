//! Claim proof generation and verification.

mod error;
mod instance;
mod keys;
mod types;

pub use zdrop_circuit::K_CLAIM;

pub use crate::error::ClaimProofError;
pub use crate::types::ClaimProofInputs;

#[cfg(feature = "prove")]
pub mod prover;

#[cfg(feature = "prove")]
pub use prover::generate_claim_proof;

#[cfg(feature = "verify")]
pub mod verifier;

#[cfg(feature = "verify")]
pub use verifier::verify_claim_proof;

#[cfg(test)]
mod tests;
