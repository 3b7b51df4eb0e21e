//! Typed handles over raw key spaces.
//!
//! Encodings are fixed: `u64` is 8 bytes big-endian, `bool` is one byte, and every 32-byte
//! identifier is stored as its raw bytes. Composite values build on these.

use std::marker::PhantomData;

use zdrop_core::base::{AccountId, FIELD_BYTES, MapRoot, Nullifier};

use crate::store::{KeySpace, StateRead, StateWrite, StoreError};

/// Decoding failure for a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The value has the wrong length.
    Length {
        /// Required encoded length.
        expected: usize,
        /// Stored length.
        actual: usize,
    },
    /// Text is not UTF-8.
    Utf8,
}

impl DecodeError {
    const fn into_store_error(self, space: KeySpace) -> StoreError {
        match self {
            Self::Length { expected, actual } => StoreError::InvalidEncoding {
                space,
                expected,
                actual,
            },
            Self::Utf8 => StoreError::InvalidText { space },
        }
    }
}

/// A value with a fixed byte encoding.
pub trait StateValue: Sized {
    /// Encode the value.
    fn encode(&self) -> Vec<u8>;

    /// Decode a value.
    ///
    /// # Errors
    /// Returns an error if `bytes` is not a valid encoding.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

/// A map key with a fixed byte encoding.
pub trait StateKey {
    /// Encode the key.
    fn key_bytes(&self) -> Vec<u8>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    bytes.try_into().map_err(|_| DecodeError::Length {
        expected: N,
        actual: bytes.len(),
    })
}

impl StateValue for u64 {
    fn encode(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        fixed::<8>(bytes).map(Self::from_be_bytes)
    }
}

impl StateValue for bool {
    fn encode(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let [byte] = fixed::<1>(bytes)?;
        Ok(byte != 0)
    }
}

impl StateValue for MapRoot {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        fixed::<FIELD_BYTES>(bytes).map(Self::new)
    }
}

impl StateKey for Nullifier {
    fn key_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl StateKey for AccountId {
    fn key_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

/// A single typed value at a fixed key.
#[derive(Debug, Clone, Copy)]
pub struct StateCell<T> {
    space: KeySpace,
    key: &'static [u8],
    _value: PhantomData<fn() -> T>,
}

impl<T: StateValue> StateCell<T> {
    /// Handle for the value under `key` in `space`.
    #[must_use]
    pub const fn new(space: KeySpace, key: &'static [u8]) -> Self {
        Self {
            space,
            key,
            _value: PhantomData,
        }
    }

    /// Current value, `None` if unset.
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored value does not decode.
    pub fn get<S: StateRead + ?Sized>(&self, state: &S) -> Result<Option<T>, StoreError> {
        state
            .get(self.space, self.key)?
            .map(|bytes| T::decode(&bytes).map_err(|err| err.into_store_error(self.space)))
            .transpose()
    }

    /// Overwrite the value.
    pub fn set<S: StateWrite + ?Sized>(&self, state: &mut S, value: &T) {
        state.put(self.space, self.key.to_vec(), value.encode());
    }
}

/// A typed map over one key space.
#[derive(Debug, Clone, Copy)]
pub struct StateMap<K, V> {
    space: KeySpace,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<K: StateKey, V: StateValue> StateMap<K, V> {
    /// Handle for the map stored in `space`.
    #[must_use]
    pub const fn new(space: KeySpace) -> Self {
        Self {
            space,
            _entry: PhantomData,
        }
    }

    /// Value under `key`, `None` if absent.
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored value does not decode.
    pub fn get<S: StateRead + ?Sized>(&self, state: &S, key: &K) -> Result<Option<V>, StoreError> {
        state
            .get(self.space, &key.key_bytes())?
            .map(|bytes| V::decode(&bytes).map_err(|err| err.into_store_error(self.space)))
            .transpose()
    }

    /// Insert or overwrite the value under `key`.
    pub fn insert<S: StateWrite + ?Sized>(&self, state: &mut S, key: &K, value: &V) {
        state.put(self.space, key.key_bytes(), value.encode());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Transaction};

    const COUNTER: StateCell<u64> = StateCell::new(KeySpace::Balances, b"counter");
    const FLAGS: StateMap<Nullifier, bool> = StateMap::new(KeySpace::Nullifiers);

    #[test]
    fn cell_round_trips_through_overlay() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        assert_eq!(COUNTER.get(&tx).expect("get"), None);
        COUNTER.set(&mut tx, &u64::MAX);
        assert_eq!(COUNTER.get(&tx).expect("get"), Some(u64::MAX));
    }

    #[test]
    fn map_entries_are_independent() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        let a = Nullifier::new([1; 32]);
        let b = Nullifier::new([2; 32]);
        FLAGS.insert(&mut tx, &a, &true);
        assert_eq!(FLAGS.get(&tx, &a).expect("get"), Some(true));
        assert_eq!(FLAGS.get(&tx, &b).expect("get"), None);
    }

    #[test]
    fn malformed_values_are_reported_with_their_space() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        tx.put(KeySpace::Balances, b"counter".to_vec(), vec![1, 2, 3]);
        let err = COUNTER.get(&tx).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidEncoding {
                space: KeySpace::Balances,
                expected: 8,
                actual: 3
            }
        ));
    }

    #[test]
    fn u64_is_big_endian() {
        assert_eq!(1000_u64.encode(), vec![0, 0, 0, 0, 0, 0, 0x03, 0xe8]);
        assert_eq!(u64::decode(&[0, 0, 0, 0, 0, 0, 0x03, 0xe8]), Ok(1000));
    }
}
