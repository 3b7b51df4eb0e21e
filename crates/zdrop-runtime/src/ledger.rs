//! Account balances.

use thiserror::Error;
use zdrop_core::base::AccountId;

use crate::state::StateMap;
use crate::store::{KeySpace, StateRead, StateWrite, StoreError};

const BALANCES: StateMap<AccountId, u64> = StateMap::new(KeySpace::Balances);

/// Errors raised by a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The credit would overflow the account balance.
    #[error("crediting {amount} to {account} overflows balance {balance}")]
    Overflow {
        /// Credited account.
        account: AccountId,
        /// Balance before the credit.
        balance: u64,
        /// Amount that was to be credited.
        amount: u64,
    },

    /// State access failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Credit-only account balances.
///
/// A ledger has no authorization of its own: whoever holds it may credit any account.
pub trait Ledger {
    /// Add `amount` to the balance of `account`, returning the new balance.
    ///
    /// Nothing is written on error.
    ///
    /// # Errors
    /// Returns [`LedgerError::Overflow`] if the balance would exceed `u64::MAX`.
    fn credit<S>(&self, state: &mut S, account: &AccountId, amount: u64) -> Result<u64, LedgerError>
    where
        S: StateRead + StateWrite + ?Sized;

    /// Balance of `account`, zero if it was never credited.
    ///
    /// # Errors
    /// Returns an error if state access fails.
    fn balance<S>(&self, state: &S, account: &AccountId) -> Result<u64, LedgerError>
    where
        S: StateRead + ?Sized;
}

/// Ledger over the `balances` key space.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceLedger;

impl Ledger for BalanceLedger {
    fn credit<S>(&self, state: &mut S, account: &AccountId, amount: u64) -> Result<u64, LedgerError>
    where
        S: StateRead + StateWrite + ?Sized,
    {
        let balance = self.balance(&*state, account)?;
        let updated = balance.checked_add(amount).ok_or(LedgerError::Overflow {
            account: *account,
            balance,
            amount,
        })?;
        BALANCES.insert(state, account, &updated);
        Ok(updated)
    }

    fn balance<S>(&self, state: &S, account: &AccountId) -> Result<u64, LedgerError>
    where
        S: StateRead + ?Sized,
    {
        Ok(BALANCES.get(state, account)?.unwrap_or_default())
    }
}
