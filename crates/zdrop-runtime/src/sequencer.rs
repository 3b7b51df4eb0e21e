//! Single-writer application of claim operations.
//!
//! Proofs are verified before the state lock is taken, so verification of concurrent claims runs
//! in parallel. The nullifier check, the nullifier write and the credit then run under the lock
//! inside a [`Transaction`], and the transaction's changes are committed only if every step
//! succeeded.

use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};
use zdrop_core::base::{AccountId, MapRoot, Nullifier};
use zdrop_core::schema::proof::ClaimProof;

use crate::error::ClaimError;
use crate::ledger::Ledger;
use crate::processor::{ClaimProcessor, ClaimReceipt};
use crate::round::RoundParameters;
use crate::store::{StateStore, StoreError, Transaction};
use crate::verifier::ClaimVerifier;

/// Owns the state store and applies operations to it one at a time.
#[derive(Debug)]
pub struct Sequencer<S, V, L> {
    store: Mutex<S>,
    processor: ClaimProcessor<V, L>,
}

impl<S, V, L> Sequencer<S, V, L>
where
    S: StateStore,
    L: Ledger,
{
    /// Sequencer over `store`.
    pub const fn new(store: S, processor: ClaimProcessor<V, L>) -> Self {
        Self {
            store: Mutex::new(store),
            processor,
        }
    }

    /// The processor operations are run through.
    pub const fn processor(&self) -> &ClaimProcessor<V, L> {
        &self.processor
    }

    /// Give back the store.
    ///
    /// # Errors
    /// Returns an error if the state lock was poisoned.
    pub fn into_store(self) -> Result<S, StoreError> {
        self.store.into_inner().map_err(|_| StoreError::Poisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, StoreError> {
        self.store.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Publish `root` as the commitment on behalf of `sender`.
    ///
    /// # Errors
    /// Returns an error if the sender is not authorized or the commit fails.
    pub fn publish_commitment(&self, sender: &AccountId, root: MapRoot) -> Result<(), ClaimError> {
        let mut store = self.lock()?;
        let mut tx = Transaction::new(&*store);
        if let Err(err) = self.processor.publish_commitment(&mut tx, sender, root) {
            warn!(%sender, reason = %err, "Commitment publication rejected");
            return Err(err);
        }
        let changes = tx.into_changes();
        store.commit(changes)?;
        info!(%sender, %root, "Commitment published");
        Ok(())
    }

    /// Publish `root` for `round` on behalf of `sender`, fixing the round on first use.
    ///
    /// # Errors
    /// Returns an error if the sender is not the round's authority, `round` differs from the
    /// stored round, or the commit fails.
    pub fn publish_round(
        &self,
        sender: &AccountId,
        root: MapRoot,
        round: &RoundParameters,
    ) -> Result<(), ClaimError> {
        let mut store = self.lock()?;
        let mut tx = Transaction::new(&*store);
        if let Err(err) = self.processor.publish_round(&mut tx, sender, root, round) {
            warn!(%sender, reason = %err, "Commitment publication rejected");
            return Err(err);
        }
        let changes = tx.into_changes();
        store.commit(changes)?;
        info!(%sender, %root, message = %round.message, "Commitment published");
        Ok(())
    }

    /// The round fixed by the first publication, if any.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn round(&self) -> Result<Option<RoundParameters>, ClaimError> {
        let store = self.lock()?;
        self.processor.round(&*store)
    }

    /// The published commitment, if any.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn commitment(&self) -> Result<Option<MapRoot>, ClaimError> {
        let store = self.lock()?;
        self.processor.commitment(&*store)
    }

    /// Whether `nullifier` has been used.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> Result<bool, ClaimError> {
        let store = self.lock()?;
        self.processor.is_nullifier_used(&*store, nullifier)
    }

    /// Balance of `account`.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    pub fn balance(&self, account: &AccountId) -> Result<u64, ClaimError> {
        let store = self.lock()?;
        self.processor.balance(&*store, account)
    }
}

impl<S, V, L> Sequencer<S, V, L>
where
    S: StateStore,
    V: ClaimVerifier,
    L: Ledger,
{
    /// Verify and apply a claim from `sender`.
    ///
    /// # Errors
    /// Returns the rejection reason; the state is unchanged on error.
    pub fn submit_claim(
        &self,
        sender: &AccountId,
        proof: &ClaimProof,
    ) -> Result<ClaimReceipt, ClaimError> {
        let claim = self.processor.verify(proof).inspect_err(|err| {
            warn!(%sender, nullifier = %proof.nullifier, reason = %err, "Claim rejected");
        })?;

        let mut store = self.lock()?;
        let mut tx = Transaction::new(&*store);
        let receipt = self
            .processor
            .apply_claim(&mut tx, sender, claim)
            .inspect_err(|err| {
                warn!(%sender, nullifier = %proof.nullifier, reason = %err, "Claim rejected");
            })?;
        let changes = tx.into_changes();
        store.commit(changes)?;

        info!(
            %sender,
            nullifier = %receipt.nullifier,
            amount = receipt.amount,
            balance = receipt.balance,
            "Claim accepted"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ledger::BalanceLedger;
    use crate::store::{MemoryStore, SledStore};
    use crate::testing::{AcceptAll, account, proof, root};

    fn sequencer<S: StateStore>(store: S) -> Sequencer<S, AcceptAll, BalanceLedger> {
        Sequencer::new(store, ClaimProcessor::new(AcceptAll, BalanceLedger))
    }

    #[test]
    fn concurrent_claims_with_one_nullifier_commit_once() {
        let seq = sequencer(MemoryStore::new());
        seq.publish_commitment(&account(1), root(7))
            .expect("publish");

        let accepted = AtomicUsize::new(0);
        let reused = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for sender in 0..8_u8 {
                let seq = &seq;
                let accepted = &accepted;
                let reused = &reused;
                scope.spawn(move || match seq.submit_claim(&account(sender), &proof(7, 42)) {
                    Ok(_) => {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(ClaimError::NullifierReused(_)) => {
                        reused.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(err) => panic!("unexpected rejection: {err}"),
                });
            }
        });

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(reused.load(Ordering::SeqCst), 7);
        let total: u64 = (0..8_u8)
            .map(|sender| seq.balance(&account(sender)).expect("balance"))
            .sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn rejected_claims_leave_the_store_untouched() {
        let seq = sequencer(MemoryStore::new());
        seq.submit_claim(&account(2), &proof(7, 42)).unwrap_err();

        let store = seq.into_store().expect("store");
        assert!(store.is_empty());
    }

    #[test]
    fn claims_persist_in_sled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state");

        {
            let seq = sequencer(SledStore::open(&path).expect("open"));
            seq.publish_commitment(&account(1), root(7))
                .expect("publish");
            seq.submit_claim(&account(2), &proof(7, 42))
                .expect("claim");
        }

        let seq = sequencer(SledStore::open(&path).expect("reopen"));
        assert_eq!(seq.commitment().expect("query"), Some(root(7)));
        assert!(
            seq.is_nullifier_used(&proof(7, 42).nullifier)
                .expect("query")
        );
        assert_eq!(seq.balance(&account(2)).expect("balance"), 1000);
        assert!(matches!(
            seq.submit_claim(&account(2), &proof(7, 42)),
            Err(ClaimError::NullifierReused(_))
        ));
    }

    #[test]
    fn round_persists_in_sled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state");
        let round = RoundParameters::new("round-1", 1000, Some(account(9)));

        {
            let seq = sequencer(SledStore::open(&path).expect("open"));
            seq.publish_round(&account(9), root(7), &round)
                .expect("publish");
        }

        let seq = sequencer(SledStore::open_existing(&path).expect("reopen"));
        assert_eq!(seq.round().expect("query"), Some(round));
        assert_eq!(seq.commitment().expect("query"), Some(root(7)));
        let next = RoundParameters::new("round-2", 1000, Some(account(9)));
        assert!(matches!(
            seq.publish_round(&account(9), root(8), &next),
            Err(ClaimError::RoundMismatch { field: "message" })
        ));
        assert_eq!(seq.commitment().expect("query"), Some(root(7)));
    }
}
