//! Test doubles for the claim processor.

use std::fmt;

use zdrop_core::base::{AccountId, MapRoot, Nullifier};
use zdrop_core::schema::proof::ClaimProof;

use crate::ledger::{Ledger, LedgerError};
use crate::store::{StateRead, StateWrite};
use crate::verifier::ClaimVerifier;

pub fn account(tag: u8) -> AccountId {
    AccountId::new([tag; 32])
}

pub fn root(tag: u8) -> MapRoot {
    MapRoot::new([tag; 32])
}

/// A proof against `root(root_tag)` exposing a nullifier derived from `nf_tag`.
pub fn proof(root_tag: u8, nf_tag: u8) -> ClaimProof {
    ClaimProof::new(vec![0xaa; 4], root(root_tag), Nullifier::new([nf_tag; 32]))
}

/// Accepts every proof.
#[derive(Debug, Clone, Copy)]
pub struct AcceptAll;

impl ClaimVerifier for AcceptAll {
    type Error = std::convert::Infallible;

    fn verify(&self, _proof: &ClaimProof) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct Rejected;

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("rejected")
    }
}

impl std::error::Error for Rejected {}

/// Rejects every proof.
#[derive(Debug, Clone, Copy)]
pub struct RejectAll;

impl ClaimVerifier for RejectAll {
    type Error = Rejected;

    fn verify(&self, _proof: &ClaimProof) -> Result<(), Self::Error> {
        Err(Rejected)
    }
}

#[derive(Debug)]
pub struct Offline;

impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("verifier offline")
    }
}

impl std::error::Error for Offline {}

/// Fails every proof without judging it.
#[derive(Debug, Clone, Copy)]
pub struct Unavailable;

impl ClaimVerifier for Unavailable {
    type Error = Offline;

    fn verify(&self, _proof: &ClaimProof) -> Result<(), Self::Error> {
        Err(Offline)
    }

    fn rejects_proof(_error: &Self::Error) -> bool {
        false
    }
}

/// A ledger whose every account is already full.
#[derive(Debug, Clone, Copy)]
pub struct OverflowingLedger;

impl Ledger for OverflowingLedger {
    fn credit<S>(&self, _state: &mut S, account: &AccountId, amount: u64) -> Result<u64, LedgerError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        Err(LedgerError::Overflow {
            account: *account,
            balance: u64::MAX,
            amount,
        })
    }

    fn balance<S>(&self, _state: &S, _account: &AccountId) -> Result<u64, LedgerError>
    where
        S: StateRead + ?Sized,
    {
        Ok(u64::MAX)
    }
}
