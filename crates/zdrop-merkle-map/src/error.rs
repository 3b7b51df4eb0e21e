use thiserror::Error;
use zdrop_core::base::MemberKey;

/// Errors that can occur when building or querying the member map.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    /// Key bytes are not a canonical `pallas::Base` encoding.
    #[error("Non-canonical member key {key} at index {index}")]
    NonCanonicalKey {
        /// Offending key bytes.
        key: MemberKey,
        /// Index in the input list.
        index: usize,
    },

    /// The same member key was listed twice.
    #[error("Duplicate member key {0}")]
    DuplicateMember(MemberKey),
}
