//! Claim processing for ZDROP.
//!
//! [`ClaimProcessor`] gates a one-time ledger credit on a valid claim proof whose root matches
//! the published commitment and whose nullifier has not been used. It reads and writes state
//! only through the [`store`] traits, so it runs unchanged over an in-memory store, a `sled`
//! database, or a [`Transaction`](store::Transaction) overlay. [`Sequencer`] serializes
//! state-changing operations and commits each one atomically.

mod error;
pub mod ledger;
pub mod processor;
pub mod round;
pub mod sequencer;
pub mod state;
pub mod store;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use error::{ClaimError, RetryHint};
pub use ledger::{BalanceLedger, Ledger, LedgerError};
pub use processor::{ClaimProcessor, ClaimReceipt, VerifiedClaim};
pub use round::RoundParameters;
pub use sequencer::Sequencer;
pub use store::{MemoryStore, SledStore, StateStore, StoreError};
pub use verifier::{ClaimVerifier, Halo2ClaimVerifier};
