//! Offline claim proof verification.

use std::path::PathBuf;

use eyre::{Context as _, ensure};
use tracing::info;
use zdrop_core::schema::config::ClaimConfiguration;
use zdrop_core::schema::proof::ClaimProof;
use zdrop_proofs::verify_claim_proof;

use super::io::read_json;
use super::params::{ParamsMode, load_or_prepare_params};

/// Verify the claim proof in `proof_file` against the configuration in `config_file`.
///
/// This is the check a sequencer runs before touching state, plus the root comparison. It says
/// nothing about whether the nullifier has been used.
///
/// # Errors
/// Returns an error if the proof does not verify or was built against another commitment.
pub async fn verify_claim(
    config_file: PathBuf,
    proof_file: PathBuf,
    params_file: PathBuf,
) -> eyre::Result<()> {
    let config: ClaimConfiguration = read_json(&config_file, "claim configuration").await?;
    let proof: ClaimProof = read_json(&proof_file, "claim proof").await?;
    let params = load_or_prepare_params(params_file, ParamsMode::Require).await?;

    info!(nullifier = %proof.nullifier, "Verifying claim proof...");
    let message = config.message.clone();
    let checked = proof.clone();
    tokio::task::spawn_blocking(move || verify_claim_proof(&params, &checked, &message))
        .await?
        .context("Claim proof is invalid")?;

    ensure!(
        proof.root == config.commitment_root,
        "Claim proof was built against root {}, but the commitment is {}",
        proof.root,
        config.commitment_root
    );
    info!(nullifier = %proof.nullifier, root = %proof.root, "Claim proof is valid");
    Ok(())
}
