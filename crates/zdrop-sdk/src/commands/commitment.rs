//! Building the member map commitment.

use std::path::PathBuf;

use eyre::{Context as _, ensure};
use tracing::info;
use zdrop_circuit::identity::member_key_from_public_key;
use zdrop_core::base::{AccountId, MemberKey};
use zdrop_core::schema::config::ClaimConfiguration;
use zdrop_core::schema::members::MemberList;
use zdrop_merkle_map::MerkleMap;

use super::io::{read_json, write_json};

fn member_keys(list: &MemberList) -> eyre::Result<Vec<MemberKey>> {
    list.members
        .iter()
        .enumerate()
        .map(|(index, pk)| {
            member_key_from_public_key(pk)
                .ok_or_else(|| eyre::eyre!("Member {index} has a non-canonical public key {pk}"))
        })
        .collect()
}

/// Build the member map for `list`.
///
/// # Errors
/// Returns an error if a public key is not canonical or a member is listed twice.
pub fn build_member_map(list: &MemberList) -> eyre::Result<MerkleMap> {
    let keys = member_keys(list)?;
    MerkleMap::from_member_keys(&keys).context("Failed to build member map")
}

/// Build the member map from `members_file` and write the claim configuration committing to it.
///
/// # Errors
/// Returns an error if the member list cannot be read, is empty, or contains an invalid or
/// duplicate member, or if the configuration cannot be written.
pub async fn build_commitment(
    members_file: PathBuf,
    message: String,
    grant_amount: u64,
    authority: Option<AccountId>,
    config_out: PathBuf,
) -> eyre::Result<ClaimConfiguration> {
    ensure!(!message.is_empty(), "Claim message must not be empty");

    info!(file = ?members_file, "Loading member list...");
    let list: MemberList = read_json(&members_file, "member list").await?;
    ensure!(!list.is_empty(), "Member list {} is empty", members_file.display());

    let member_count = u64::try_from(list.len())?;
    info!(members = member_count, "Building member map...");
    let map = tokio::task::spawn_blocking(move || build_member_map(&list)).await??;
    let root = map.root_bytes();

    let config = ClaimConfiguration::new(message, grant_amount, root, member_count, authority);
    write_json(&config_out, &config).await?;
    info!(file = ?config_out, %root, members = member_count, "Claim configuration written");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;
    use zdrop_circuit::SpendingKey;
    use zdrop_core::base::PublicKeyBytes;

    use super::*;

    fn members(n: usize) -> MemberList {
        MemberList::new(
            (0..n)
                .map(|_| SpendingKey::random(OsRng).public_key_bytes())
                .collect(),
        )
    }

    #[tokio::test]
    async fn writes_configuration_for_member_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let members_file = dir.path().join("members.json");
        let config_out = dir.path().join("config.json");
        let list = members(3);
        std::fs::write(&members_file, serde_json::to_string(&list).expect("json")).expect("write");

        let config = build_commitment(
            members_file,
            "round-1".to_owned(),
            1000,
            None,
            config_out.clone(),
        )
        .await
        .expect("build");

        let expected = build_member_map(&list).expect("map").root_bytes();
        assert_eq!(config.commitment_root, expected);
        assert_eq!(config.member_count, 3);

        let written: ClaimConfiguration =
            serde_json::from_str(&std::fs::read_to_string(&config_out).expect("read"))
                .expect("parse");
        assert_eq!(written, config);
    }

    #[tokio::test]
    async fn rejects_empty_member_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let members_file = dir.path().join("members.json");
        std::fs::write(&members_file, r#"{"members":[]}"#).expect("write");

        let result = build_commitment(
            members_file,
            "round-1".to_owned(),
            1000,
            None,
            dir.path().join("config.json"),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_members_are_rejected() {
        let mut list = members(2);
        let first = list.members.first().copied().expect("member");
        list.members.push(first);
        assert!(build_member_map(&list).is_err());
    }

    #[test]
    fn non_canonical_public_key_is_rejected() {
        let list = MemberList::new(vec![PublicKeyBytes::new([0xff; 32])]);
        let err = build_member_map(&list).expect_err("non-canonical");
        assert!(err.to_string().contains("Member 0"));
    }
}
