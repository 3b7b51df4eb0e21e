//! Claim circuit components used by ZDROP proving and verification.
//!
//! The circuit proves, for a public member map root and nullifier, that the prover knows a
//! spending key whose member key is set in the map and from which the nullifier was derived.

pub mod circuit;
pub mod identity;

pub use circuit::{Circuit, Instance, K_CLAIM};
pub use identity::{SpendingKey, claim_message, member_key, nullifier, public_key};
