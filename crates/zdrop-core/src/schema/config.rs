use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base::{AccountId, MapRoot};

/// Grant credited for each successful claim unless a configuration overrides it.
pub const DEFAULT_GRANT_AMOUNT: u64 = 1000;

const fn default_grant_amount() -> u64 {
    DEFAULT_GRANT_AMOUNT
}

/// Configuration for a claim round.
///
/// Published by the authority alongside the member list. Claimants need the `message` to derive
/// their nullifier and the `commitment_root` to check their witness before proving.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimConfiguration {
    /// Public message the nullifiers of this round are bound to.
    pub message: String,
    /// Amount credited to the sender of each successful claim.
    #[serde(default = "default_grant_amount")]
    pub grant_amount: u64,
    /// Member map root to publish as the commitment.
    pub commitment_root: MapRoot,
    /// Number of members committed to by `commitment_root`.
    pub member_count: u64,
    /// Account allowed to publish commitments. Anyone may publish when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<AccountId>,
}

impl ClaimConfiguration {
    /// Create a new claim configuration.
    #[must_use]
    pub const fn new(
        message: String,
        grant_amount: u64,
        commitment_root: MapRoot,
        member_count: u64,
        authority: Option<AccountId>,
    ) -> Self {
        Self {
            message,
            grant_amount,
            commitment_root,
            member_count,
            authority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_amount_defaults_when_missing() {
        let json = format!(
            r#"{{"message":"round-1","commitment_root":"{}","member_count":3}}"#,
            "00".repeat(32)
        );
        let config: ClaimConfiguration = serde_json::from_str(&json).expect("parse config");
        assert_eq!(config.grant_amount, DEFAULT_GRANT_AMOUNT);
        assert_eq!(config.authority, None);
    }

    #[test]
    fn authority_is_omitted_when_unset() {
        let config = ClaimConfiguration::new(
            "round-1".to_owned(),
            5,
            MapRoot::default(),
            0,
            None,
        );
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(!json.contains("authority"));
    }
}
