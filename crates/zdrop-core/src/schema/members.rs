//! Member list schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base::PublicKeyBytes;

/// Public keys of every eligible recipient in a claim round.
///
/// Anyone holding this list can rebuild the member map and extract a witness, so the list is
/// published next to the claim configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct MemberList {
    /// Member public keys.
    pub members: Vec<PublicKeyBytes>,
}

impl MemberList {
    /// Create a member list.
    #[must_use]
    pub const fn new(members: Vec<PublicKeyBytes>) -> Self {
        Self { members }
    }

    /// Number of listed members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
