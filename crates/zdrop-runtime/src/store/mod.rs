//! Key-value state storage with an explicit commit boundary.
//!
//! State lives in a few [`KeySpace`]s of raw byte keys and values. Writers never touch a store
//! directly: they write into a [`Transaction`] overlay, and the resulting [`ChangeSet`] is applied
//! by [`StateStore::commit`] in one step. Dropping a transaction discards its writes.

mod error;
mod memory;
mod persistent;

use std::collections::BTreeMap;
use std::fmt;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use persistent::SledStore;

/// Disjoint key spaces of the claim state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeySpace {
    /// The published member map root.
    Commitment,
    /// Used nullifiers.
    Nullifiers,
    /// Account balances.
    Balances,
}

impl KeySpace {
    /// All key spaces.
    pub const ALL: [Self; 3] = [Self::Commitment, Self::Nullifiers, Self::Balances];

    /// Stable name, used as the `sled` tree name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Commitment => "commitment",
            Self::Nullifiers => "nullifiers",
            Self::Balances => "balances",
        }
    }
}

impl fmt::Display for KeySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read access to state.
pub trait StateRead {
    /// Raw value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend fails.
    fn get(&self, space: KeySpace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Buffered write access to state.
pub trait StateWrite {
    /// Set `key` to `value`.
    fn put(&mut self, space: KeySpace, key: Vec<u8>, value: Vec<u8>);

    /// Remove `key`.
    fn delete(&mut self, space: KeySpace, key: Vec<u8>);
}

/// A store that can apply change sets atomically.
pub trait StateStore: StateRead {
    /// Apply every change in `changes`, or none of them.
    ///
    /// # Errors
    /// Returns an error if the backend fails, in which case no change is visible.
    fn commit(&mut self, changes: ChangeSet) -> Result<(), StoreError>;
}

impl<T: StateRead + ?Sized> StateRead for &T {
    fn get(&self, space: KeySpace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(space, key)
    }
}

/// Pending writes, keyed by space and key. `None` marks a deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeMap<(KeySpace, Vec<u8>), Option<Vec<u8>>>,
}

impl ChangeSet {
    /// Create an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: BTreeMap::new(),
        }
    }

    /// Whether nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Changes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (KeySpace, &[u8], Option<&[u8]>)> {
        self.changes
            .iter()
            .map(|((space, key), value)| (*space, key.as_slice(), value.as_deref()))
    }

    fn lookup(&self, space: KeySpace, key: &[u8]) -> Option<Option<&[u8]>> {
        self.changes
            .get(&(space, key.to_vec()))
            .map(Option::as_deref)
    }
}

impl StateWrite for ChangeSet {
    fn put(&mut self, space: KeySpace, key: Vec<u8>, value: Vec<u8>) {
        self.changes.insert((space, key), Some(value));
    }

    fn delete(&mut self, space: KeySpace, key: Vec<u8>) {
        self.changes.insert((space, key), None);
    }
}

/// A write overlay over a readable base.
///
/// Reads see the overlay's own writes first. Nothing reaches the base until the caller takes the
/// change set with [`Transaction::into_changes`] and commits it.
#[derive(Debug)]
pub struct Transaction<B> {
    base: B,
    changes: ChangeSet,
}

impl<B: StateRead> Transaction<B> {
    /// Open an empty overlay over `base`.
    pub const fn new(base: B) -> Self {
        Self {
            base,
            changes: ChangeSet::new(),
        }
    }

    /// The buffered writes.
    #[must_use]
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }
}

impl<B: StateRead> StateRead for Transaction<B> {
    fn get(&self, space: KeySpace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.changes.lookup(space, key) {
            Some(value) => Ok(value.map(<[u8]>::to_vec)),
            None => self.base.get(space, key),
        }
    }
}

impl<B: StateRead> StateWrite for Transaction<B> {
    fn put(&mut self, space: KeySpace, key: Vec<u8>, value: Vec<u8>) {
        self.changes.put(space, key, value);
    }

    fn delete(&mut self, space: KeySpace, key: Vec<u8>) {
        self.changes.delete(space, key);
    }
}
