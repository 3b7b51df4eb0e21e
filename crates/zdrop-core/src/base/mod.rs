//! Foundational primitive types and byte/serde helpers.

mod bytes;

pub use bytes::{
    AccountId, FIELD_BYTES, MapRoot, MemberKey, Nullifier, ParseBytesError, PublicKeyBytes,
};
