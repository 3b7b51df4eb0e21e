//! `sled`-backed store.
//!
//! Each [`KeySpace`] is its own tree. Commits run as a single multi-tree transaction and are
//! flushed before returning, so a committed claim survives a restart.

use std::convert::Infallible;
use std::path::Path;

use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use tracing::debug;

use super::{ChangeSet, KeySpace, StateRead, StateStore, StoreError};

/// Durable store backed by a `sled` database.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    commitment: Tree,
    nullifiers: Tree,
    balances: Tree,
}

impl SledStore {
    /// Open (or create) a database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database or one of its trees cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening state database");
        let db = sled::Config::new().path(path).open()?;
        Self::from_db(db)
    }

    /// Open the database at `path`, which must already exist.
    ///
    /// # Errors
    /// Returns [`StoreError::Missing`] if there is nothing at `path`, or an error if the database
    /// cannot be opened.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        Self::open(path)
    }

    /// Open a throwaway database that is removed on drop.
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self, StoreError> {
        Ok(Self {
            commitment: db.open_tree(KeySpace::Commitment.name())?,
            nullifiers: db.open_tree(KeySpace::Nullifiers.name())?,
            balances: db.open_tree(KeySpace::Balances.name())?,
            db,
        })
    }

    const fn tree(&self, space: KeySpace) -> &Tree {
        match space {
            KeySpace::Commitment => &self.commitment,
            KeySpace::Nullifiers => &self.nullifiers,
            KeySpace::Balances => &self.balances,
        }
    }
}

impl StateRead for SledStore {
    fn get(&self, space: KeySpace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tree(space).get(key)?.map(|value| value.to_vec()))
    }
}

impl StateStore for SledStore {
    fn commit(&mut self, changes: ChangeSet) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        (&self.commitment, &self.nullifiers, &self.balances)
            .transaction(|(commitment, nullifiers, balances)| {
                for (space, key, value) in changes.iter() {
                    let tree = match space {
                        KeySpace::Commitment => commitment,
                        KeySpace::Nullifiers => nullifiers,
                        KeySpace::Balances => balances,
                    };
                    match value {
                        Some(value) => {
                            tree.insert(key, value)?;
                        }
                        None => {
                            tree.remove(key)?;
                        }
                    }
                }
                Ok::<(), ConflictableTransactionError<Infallible>>(())
            })
            .map_err(|err| match err {
                TransactionError::Abort(never) => match never {},
                TransactionError::Storage(err) => StoreError::Sled(err),
            })?;

        self.db.flush()?;
        debug!(changes = changes.len(), "Committed state changes");
        Ok(())
    }
}
