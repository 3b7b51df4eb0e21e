use std::collections::BTreeMap;

use super::{ChangeSet, KeySpace, StateRead, StateStore, StoreError};

/// Volatile store backed by a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<(KeySpace, Vec<u8>), Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Whether no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateRead for MemoryStore {
    fn get(&self, space: KeySpace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(&(space, key.to_vec())).cloned())
    }
}

impl StateStore for MemoryStore {
    fn commit(&mut self, changes: ChangeSet) -> Result<(), StoreError> {
        for (space, key, value) in changes.iter() {
            match value {
                Some(value) => {
                    self.entries.insert((space, key.to_vec()), value.to_vec());
                }
                None => {
                    self.entries.remove(&(space, key.to_vec()));
                }
            }
        }
        Ok(())
    }
}
