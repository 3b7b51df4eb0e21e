//! Claim proof schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::base::{MapRoot, Nullifier};

/// A claim proof together with its public output.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimProof {
    /// The Halo2 proof bytes.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub zkproof: Vec<u8>,
    /// Member map root the proof was built against.
    pub root: MapRoot,
    /// Nullifier tag exposed by the proof.
    pub nullifier: Nullifier,
}

impl ClaimProof {
    /// Create a claim proof from its parts.
    #[must_use]
    pub const fn new(zkproof: Vec<u8>, root: MapRoot, nullifier: Nullifier) -> Self {
        Self {
            zkproof,
            root,
            nullifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_bytes_are_hex_encoded() {
        let proof = ClaimProof::new(
            vec![0xde, 0xad],
            MapRoot::new([1; 32]),
            Nullifier::new([2; 32]),
        );
        let value = serde_json::to_value(&proof).expect("serialize");
        assert_eq!(value["zkproof"], "dead");
        assert_eq!(value["nullifier"], "02".repeat(32));
    }
}
