use std::path::PathBuf;

use thiserror::Error;

use super::KeySpace;

/// Errors raised by state storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `sled` backend failed.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// A stored value did not decode.
    #[error("invalid value in {space}: expected {expected} bytes, got {actual}")]
    InvalidEncoding {
        /// Key space of the value.
        space: KeySpace,
        /// Required encoded length.
        expected: usize,
        /// Stored length.
        actual: usize,
    },

    /// A stored text value is not UTF-8.
    #[error("invalid text in {space}")]
    InvalidText {
        /// Key space of the value.
        space: KeySpace,
    },

    /// The database does not exist.
    #[error("no state database at {0}")]
    Missing(PathBuf),

    /// A previous writer panicked while holding the state lock.
    #[error("state lock poisoned")]
    Poisoned,
}
