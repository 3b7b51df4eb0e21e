use std::error::Error;

use thiserror::Error;
use zdrop_core::base::{AccountId, MapRoot, Nullifier};

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// What a sender can do about a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryHint {
    /// The submission can never succeed.
    RejectedPermanently,
    /// Resubmit once a commitment has been published.
    RetryAfterPublication,
    /// Build a new proof against the current commitment.
    RebuildProof,
    /// The state machine itself is in trouble; stop and alert an operator.
    Fatal,
}

/// Reasons a commitment publication or claim is rejected. State is unchanged in every case.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The claim proof did not verify.
    #[error("claim proof rejected: {0}")]
    ProofInvalid(#[source] Box<dyn Error + Send + Sync>),

    /// The verifier could not judge the proof.
    #[error("claim verifier failed: {0}")]
    VerifierFault(#[source] Box<dyn Error + Send + Sync>),

    /// No commitment has been published yet.
    #[error("no commitment has been published")]
    CommitmentUnset,

    /// The proof was built against another member map.
    #[error("proof root {proof_root} does not match commitment {commitment}")]
    RootMismatch {
        /// Currently published root.
        commitment: MapRoot,
        /// Root exposed by the proof.
        proof_root: MapRoot,
    },

    /// The nullifier was already used by an earlier claim.
    #[error("nullifier {0} has already been used")]
    NullifierReused(Nullifier),

    /// Crediting the grant would overflow the sender's balance.
    #[error("crediting {amount} to {account} overflows balance {balance}")]
    Overflow {
        /// Credited account.
        account: AccountId,
        /// Balance before the credit.
        balance: u64,
        /// Grant amount.
        amount: u64,
    },

    /// The sender may not publish commitments.
    #[error("{sender} is not allowed to publish commitments")]
    Unauthorized {
        /// Rejected sender.
        sender: AccountId,
    },

    /// The round parameters differ from the ones fixed by the first publication.
    #[error("{field} differs from the published round")]
    RoundMismatch {
        /// First differing parameter.
        field: &'static str,
    },

    /// State access failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClaimError {
    /// How the sender should react to this rejection.
    #[must_use]
    pub const fn retry_hint(&self) -> RetryHint {
        match self {
            Self::ProofInvalid(_)
            | Self::NullifierReused(_)
            | Self::Unauthorized { .. }
            | Self::RoundMismatch { .. } => RetryHint::RejectedPermanently,
            Self::CommitmentUnset => RetryHint::RetryAfterPublication,
            Self::RootMismatch { .. } => RetryHint::RebuildProof,
            Self::VerifierFault(_) | Self::Overflow { .. } | Self::Store(_) => RetryHint::Fatal,
        }
    }
}

impl From<LedgerError> for ClaimError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Overflow {
                account,
                balance,
                amount,
            } => Self::Overflow {
                account,
                balance,
                amount,
            },
            LedgerError::Store(err) => Self::Store(err),
        }
    }
}
