//! The claim state machine.
//!
//! Before the first publication there is no commitment and every claim fails with
//! [`ClaimError::CommitmentUnset`]. Publishing a commitment overwrites the previous one; used
//! nullifiers are kept across publications so a recipient cannot claim twice by waiting for a
//! new root. [`ClaimProcessor::publish_round`] also fixes the [`RoundParameters`] on the first
//! publication.

use zdrop_core::base::{AccountId, MapRoot, Nullifier};
use zdrop_core::schema::config::DEFAULT_GRANT_AMOUNT;
use zdrop_core::schema::proof::ClaimProof;

use crate::error::ClaimError;
use crate::ledger::Ledger;
use crate::round::RoundParameters;
use crate::state::{StateCell, StateMap};
use crate::store::{KeySpace, StateRead, StateWrite};
use crate::verifier::ClaimVerifier;

const COMMITMENT: StateCell<MapRoot> = StateCell::new(KeySpace::Commitment, b"root");
const NULLIFIERS: StateMap<Nullifier, bool> = StateMap::new(KeySpace::Nullifiers);

/// A claim whose proof has verified.
///
/// Only [`ClaimProcessor::verify`] creates one, so holding a `VerifiedClaim` means the proof
/// check has passed. The root and nullifier checks still happen in [`ClaimProcessor::apply_claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedClaim {
    root: MapRoot,
    nullifier: Nullifier,
}

impl VerifiedClaim {
    /// Root the proof was built against.
    #[must_use]
    pub const fn root(&self) -> MapRoot {
        self.root
    }

    /// Nullifier exposed by the proof.
    #[must_use]
    pub const fn nullifier(&self) -> Nullifier {
        self.nullifier
    }
}

/// Outcome of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// Nullifier that is now used.
    pub nullifier: Nullifier,
    /// Amount credited.
    pub amount: u64,
    /// Sender balance after the credit.
    pub balance: u64,
}

/// Gates a one-time credit on a verified, fresh claim against the published commitment.
#[derive(Debug, Clone)]
pub struct ClaimProcessor<V, L> {
    verifier: V,
    ledger: L,
    grant_amount: u64,
    authority: Option<AccountId>,
}

impl<V, L: Ledger> ClaimProcessor<V, L> {
    /// Processor granting [`DEFAULT_GRANT_AMOUNT`] per claim, with unrestricted publication.
    pub const fn new(verifier: V, ledger: L) -> Self {
        Self {
            verifier,
            ledger,
            grant_amount: DEFAULT_GRANT_AMOUNT,
            authority: None,
        }
    }

    /// Credit `amount` per claim instead of the default.
    #[must_use]
    pub const fn with_grant_amount(mut self, amount: u64) -> Self {
        self.grant_amount = amount;
        self
    }

    /// Only let `authority` publish commitments.
    #[must_use]
    pub const fn with_authority(mut self, authority: Option<AccountId>) -> Self {
        self.authority = authority;
        self
    }

    /// Amount credited per claim.
    #[must_use]
    pub const fn grant_amount(&self) -> u64 {
        self.grant_amount
    }

    /// The ledger claims are credited to.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Overwrite the commitment with `root`.
    ///
    /// Publishing the current root again changes nothing. Used nullifiers are untouched.
    ///
    /// # Errors
    /// Returns [`ClaimError::Unauthorized`] if an authority is configured and `sender` is not it.
    pub fn publish_commitment<S>(
        &self,
        state: &mut S,
        sender: &AccountId,
        root: MapRoot,
    ) -> Result<(), ClaimError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        if let Some(authority) = &self.authority
            && authority != sender
        {
            return Err(ClaimError::Unauthorized { sender: *sender });
        }
        COMMITMENT.set(state, &root);
        Ok(())
    }

    /// Publish `root` for `round`.
    ///
    /// The first publication stores `round`; later ones must repeat it exactly. Publication is
    /// limited to the stored round's authority when it has one.
    ///
    /// # Errors
    /// Returns [`ClaimError::Unauthorized`] if `sender` is not the round's authority, or
    /// [`ClaimError::RoundMismatch`] if `round` differs from the stored one.
    pub fn publish_round<S>(
        &self,
        state: &mut S,
        sender: &AccountId,
        root: MapRoot,
        round: &RoundParameters,
    ) -> Result<(), ClaimError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        let stored = RoundParameters::load(&*state)?;
        let fixed = stored.as_ref().unwrap_or(round);
        if let Some(authority) = &fixed.authority
            && authority != sender
        {
            return Err(ClaimError::Unauthorized { sender: *sender });
        }
        match &stored {
            Some(stored) => stored.ensure_matches(round)?,
            None => round.store(&mut *state),
        }
        COMMITMENT.set(state, &root);
        Ok(())
    }

    /// The round fixed by the first publication, if any.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn round<S: StateRead + ?Sized>(
        &self,
        state: &S,
    ) -> Result<Option<RoundParameters>, ClaimError> {
        Ok(RoundParameters::load(state)?)
    }

    /// The published commitment, if any.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn commitment<S: StateRead + ?Sized>(&self, state: &S) -> Result<Option<MapRoot>, ClaimError> {
        Ok(COMMITMENT.get(state)?)
    }

    /// Whether `nullifier` has been used by a successful claim.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn is_nullifier_used<S: StateRead + ?Sized>(
        &self,
        state: &S,
        nullifier: &Nullifier,
    ) -> Result<bool, ClaimError> {
        Ok(NULLIFIERS.get(state, nullifier)?.unwrap_or(false))
    }

    /// Balance of `account`.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn balance<S: StateRead + ?Sized>(
        &self,
        state: &S,
        account: &AccountId,
    ) -> Result<u64, ClaimError> {
        Ok(self.ledger.balance(state, account)?)
    }
}

impl<V: ClaimVerifier, L: Ledger> ClaimProcessor<V, L> {
    /// Check the proof itself. Touches no state.
    ///
    /// # Errors
    /// Returns [`ClaimError::ProofInvalid`] if the proof does not verify, or
    /// [`ClaimError::VerifierFault`] if the verifier cannot judge it.
    pub fn verify(&self, proof: &ClaimProof) -> Result<VerifiedClaim, ClaimError> {
        self.verifier.verify(proof).map_err(|err| {
            if V::rejects_proof(&err) {
                ClaimError::ProofInvalid(Box::new(err))
            } else {
                ClaimError::VerifierFault(Box::new(err))
            }
        })?;
        Ok(VerifiedClaim {
            root: proof.root,
            nullifier: proof.nullifier,
        })
    }

    /// Check a verified claim against the state and, if it passes, mark its nullifier used and
    /// credit `sender`.
    ///
    /// Either both writes happen or neither does.
    ///
    /// # Errors
    /// Returns [`ClaimError::CommitmentUnset`], [`ClaimError::RootMismatch`],
    /// [`ClaimError::NullifierReused`] or [`ClaimError::Overflow`] when the claim is rejected.
    pub fn apply_claim<S>(
        &self,
        state: &mut S,
        sender: &AccountId,
        claim: VerifiedClaim,
    ) -> Result<ClaimReceipt, ClaimError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        let commitment = COMMITMENT.get(&*state)?.ok_or(ClaimError::CommitmentUnset)?;
        if commitment != claim.root {
            return Err(ClaimError::RootMismatch {
                commitment,
                proof_root: claim.root,
            });
        }
        if NULLIFIERS.get(&*state, &claim.nullifier)?.unwrap_or(false) {
            return Err(ClaimError::NullifierReused(claim.nullifier));
        }

        // The credit is the only step that can fail, so it goes before the nullifier write.
        let balance = self.ledger.credit(&mut *state, sender, self.grant_amount)?;
        NULLIFIERS.insert(state, &claim.nullifier, &true);

        Ok(ClaimReceipt {
            nullifier: claim.nullifier,
            amount: self.grant_amount,
            balance,
        })
    }

    /// [`verify`](Self::verify) then [`apply_claim`](Self::apply_claim).
    ///
    /// # Errors
    /// Returns the first rejection reason.
    pub fn process_claim<S>(
        &self,
        state: &mut S,
        sender: &AccountId,
        proof: &ClaimProof,
    ) -> Result<ClaimReceipt, ClaimError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        let claim = self.verify(proof)?;
        self.apply_claim(state, sender, claim)
    }
}
