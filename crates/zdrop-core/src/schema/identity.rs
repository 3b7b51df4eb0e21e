//! Public identity schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base::{MemberKey, PublicKeyBytes};

/// The shareable half of a claim identity.
///
/// Recipients hand `public_key` to the authority for inclusion in the member list. The
/// `member_key` is where that public key lands in the member map.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct PublicIdentity {
    /// Identity public key.
    pub public_key: PublicKeyBytes,
    /// Member map key derived from `public_key`.
    pub member_key: MemberKey,
}
