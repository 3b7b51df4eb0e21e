//! Claim proof generation.

use std::path::PathBuf;

use eyre::ensure;
use tracing::info;
use zdrop_core::schema::config::ClaimConfiguration;
use zdrop_core::schema::members::MemberList;
use zdrop_core::schema::proof::ClaimProof;
use zdrop_proofs::{ClaimProofInputs, generate_claim_proof};

use super::commitment::build_member_map;
use super::io::{read_json, write_json};
use super::key::read_spending_key;
use super::params::{ParamsMode, load_or_prepare_params};

/// Prove membership of the identity in `key_file` and write the claim proof to `proof_out`.
///
/// The member map is rebuilt from `members_file` and must reproduce the configured commitment
/// before any proving work starts.
///
/// # Errors
/// Returns an error if the member list does not match the configuration, the identity is not a
/// member, params cannot be loaded, or proving fails.
pub async fn claim_prove(
    config_file: PathBuf,
    members_file: PathBuf,
    key_file: PathBuf,
    params_file: PathBuf,
    params_mode: ParamsMode,
    proof_out: PathBuf,
) -> eyre::Result<ClaimProof> {
    let config: ClaimConfiguration = read_json(&config_file, "claim configuration").await?;
    let list: MemberList = read_json(&members_file, "member list").await?;
    let spending_key = read_spending_key(&key_file).await?;

    info!(members = list.len(), "Rebuilding member map...");
    let map = tokio::task::spawn_blocking(move || build_member_map(&list)).await??;
    ensure!(
        map.root_bytes() == config.commitment_root,
        "Member list {} does not reproduce commitment {}",
        members_file.display(),
        config.commitment_root
    );

    let member_key = spending_key.member_key();
    ensure!(
        map.is_member(&member_key),
        "Identity {} is not in the member list",
        spending_key.public_key_bytes()
    );
    let witness = map.witness(member_key);

    let params = load_or_prepare_params(params_file, params_mode).await?;
    let inputs = ClaimProofInputs {
        message: config.message,
        spending_key,
        witness,
    };

    info!("Generating claim proof...");
    let proof =
        tokio::task::spawn_blocking(move || generate_claim_proof(&params, &inputs)).await??;

    write_json(&proof_out, &proof).await?;
    info!(
        file = ?proof_out,
        root = %proof.root,
        nullifier = %proof.nullifier,
        "Claim proof written"
    );
    Ok(proof)
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;
    use zdrop_circuit::SpendingKey;

    use super::*;
    use crate::commands::{build_commitment, key_generate};

    struct Round {
        dir: tempfile::TempDir,
        config: PathBuf,
        members: PathBuf,
    }

    async fn round(list: &MemberList) -> Round {
        let dir = tempfile::tempdir().expect("tempdir");
        let members = dir.path().join("members.json");
        let config = dir.path().join("config.json");
        std::fs::write(&members, serde_json::to_string(list).expect("json")).expect("write");
        build_commitment(members.clone(), "round-1".to_owned(), 1000, None, config.clone())
            .await
            .expect("commitment");
        Round {
            dir,
            config,
            members,
        }
    }

    #[tokio::test]
    async fn non_member_is_refused_before_proving() {
        let others = MemberList::new(vec![SpendingKey::random(OsRng).public_key_bytes()]);
        let round = round(&others).await;
        let key = round.dir.path().join("identity.json");
        key_generate(key.clone(), false).await.expect("identity");

        let err = claim_prove(
            round.config,
            round.members,
            key,
            round.dir.path().join("params.bin"),
            ParamsMode::Require,
            round.dir.path().join("proof.json"),
        )
        .await
        .expect_err("not a member");
        assert!(err.to_string().contains("not in the member list"));
    }

    #[tokio::test]
    async fn stale_member_list_is_refused() {
        let key_dir = tempfile::tempdir().expect("tempdir");
        let key = key_dir.path().join("identity.json");
        let identity = key_generate(key.clone(), false).await.expect("identity");

        let round = round(&MemberList::new(vec![identity.public_key])).await;
        let grown = MemberList::new(vec![
            identity.public_key,
            SpendingKey::random(OsRng).public_key_bytes(),
        ]);
        std::fs::write(&round.members, serde_json::to_string(&grown).expect("json"))
            .expect("write");

        let err = claim_prove(
            round.config,
            round.members,
            key,
            round.dir.path().join("params.bin"),
            ParamsMode::Require,
            round.dir.path().join("proof.json"),
        )
        .await
        .expect_err("stale list");
        assert!(err.to_string().contains("does not reproduce commitment"));
    }
}
