//! Parameters fixed by the first commitment publication.
//!
//! A round is identified by its claim message. Claim nullifiers are bound to that message, so
//! letting it change after publication would hand every member a fresh nullifier. The grant
//! amount and the publishing authority are fixed alongside it.

use zdrop_core::base::{AccountId, FIELD_BYTES};
use zdrop_core::schema::config::ClaimConfiguration;

use crate::error::ClaimError;
use crate::ledger::Ledger;
use crate::processor::ClaimProcessor;
use crate::state::{DecodeError, StateCell, StateValue};
use crate::store::{KeySpace, StateRead, StateWrite, StoreError};

const ROUND: StateCell<RoundParameters> = StateCell::new(KeySpace::Commitment, b"round");

// Grant amount plus the authority flag.
const HEADER: usize = 9;
const HEADER_WITH_AUTHORITY: usize = 41;

/// Message, grant amount and authority of a claim round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundParameters {
    /// Message claim nullifiers are bound to.
    pub message: String,
    /// Amount credited per claim.
    pub grant_amount: u64,
    /// Only account allowed to publish commitments, if any.
    pub authority: Option<AccountId>,
}

impl RoundParameters {
    /// Round parameters from their parts.
    pub fn new(
        message: impl Into<String>,
        grant_amount: u64,
        authority: Option<AccountId>,
    ) -> Self {
        Self {
            message: message.into(),
            grant_amount,
            authority,
        }
    }

    /// The round fixed in `state`, `None` before the first publication.
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored round does not decode.
    pub fn load<S: StateRead + ?Sized>(state: &S) -> Result<Option<Self>, StoreError> {
        ROUND.get(state)
    }

    pub(crate) fn store<S: StateWrite + ?Sized>(&self, state: &mut S) {
        ROUND.set(state, self);
    }

    /// Check that `other` names this round.
    ///
    /// # Errors
    /// Returns [`ClaimError::RoundMismatch`] naming the first parameter that differs.
    pub fn ensure_matches(&self, other: &Self) -> Result<(), ClaimError> {
        let field = if self.message != other.message {
            "message"
        } else if self.grant_amount != other.grant_amount {
            "grant amount"
        } else if self.authority != other.authority {
            "authority"
        } else {
            return Ok(());
        };
        Err(ClaimError::RoundMismatch { field })
    }

    /// A processor crediting this round's grant and enforcing its authority.
    pub const fn processor<V, L: Ledger>(&self, verifier: V, ledger: L) -> ClaimProcessor<V, L> {
        ClaimProcessor::new(verifier, ledger)
            .with_grant_amount(self.grant_amount)
            .with_authority(self.authority)
    }
}

impl From<&ClaimConfiguration> for RoundParameters {
    fn from(config: &ClaimConfiguration) -> Self {
        Self::new(config.message.clone(), config.grant_amount, config.authority)
    }
}

/// Grant amount (8 bytes big-endian), an authority flag byte followed by the authority when it
/// is set, then the message as UTF-8.
impl StateValue for RoundParameters {
    fn encode(&self) -> Vec<u8> {
        let mut out = self.grant_amount.encode();
        match &self.authority {
            Some(authority) => {
                out.push(1);
                out.extend_from_slice(authority.as_bytes());
            }
            None => out.push(0),
        }
        out.extend_from_slice(self.message.as_bytes());
        out
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let short = |expected| DecodeError::Length {
            expected,
            actual: bytes.len(),
        };
        let (grant_amount, rest) = bytes
            .split_first_chunk::<8>()
            .ok_or_else(|| short(HEADER))?;
        let (flag, rest) = rest.split_first().ok_or_else(|| short(HEADER))?;
        let (authority, message) = if *flag == 0 {
            (None, rest)
        } else {
            let (authority, rest) = rest
                .split_first_chunk::<FIELD_BYTES>()
                .ok_or_else(|| short(HEADER_WITH_AUTHORITY))?;
            (Some(AccountId::new(*authority)), rest)
        };
        let message = std::str::from_utf8(message).map_err(|_| DecodeError::Utf8)?;

        Ok(Self {
            message: message.to_owned(),
            grant_amount: u64::from_be_bytes(*grant_amount),
            authority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Transaction};
    use crate::testing::account;

    #[test]
    fn stored_round_reads_back() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        assert_eq!(RoundParameters::load(&tx).expect("load"), None);

        let round = RoundParameters::new("round-1", 1000, Some(account(9)));
        round.store(&mut tx);
        assert_eq!(RoundParameters::load(&tx).expect("load"), Some(round));

        let open = RoundParameters::new("", 5, None);
        open.store(&mut tx);
        assert_eq!(RoundParameters::load(&tx).expect("load"), Some(open));
    }

    #[test]
    fn truncated_round_is_reported() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        let mut bytes = 1000_u64.encode();
        bytes.push(1);
        bytes.extend_from_slice(&[9; 4]);
        tx.put(KeySpace::Commitment, b"round".to_vec(), bytes);

        let err = RoundParameters::load(&tx).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidEncoding {
                space: KeySpace::Commitment,
                expected: HEADER_WITH_AUTHORITY,
                actual: 13
            }
        ));
    }

    #[test]
    fn non_utf8_message_is_reported() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        let mut bytes = 1000_u64.encode();
        bytes.extend_from_slice(&[0, 0xff, 0xfe]);
        tx.put(KeySpace::Commitment, b"round".to_vec(), bytes);

        assert!(matches!(
            RoundParameters::load(&tx),
            Err(StoreError::InvalidText {
                space: KeySpace::Commitment
            })
        ));
    }

    #[test]
    fn mismatch_names_the_differing_parameter() {
        let round = RoundParameters::new("round-1", 1000, None);
        round.ensure_matches(&round.clone()).expect("same round");

        let err = round
            .ensure_matches(&RoundParameters::new("round-1-evil", 1000, None))
            .unwrap_err();
        assert!(matches!(err, ClaimError::RoundMismatch { field: "message" }));

        let err = round
            .ensure_matches(&RoundParameters::new("round-1", 1_000_000, None))
            .unwrap_err();
        assert!(matches!(err, ClaimError::RoundMismatch { field: "grant amount" }));

        let err = round
            .ensure_matches(&RoundParameters::new("round-1", 1000, Some(account(1))))
            .unwrap_err();
        assert!(matches!(err, ClaimError::RoundMismatch { field: "authority" }));
    }
}
