//! Local claim state backed by a `sled` database.
//!
//! Each command opens the database, runs one sequencer operation and closes it again. The first
//! publication fixes the round's message, grant amount and authority in the database; later
//! commands take them from there and refuse a configuration that names another round. Commands
//! that do not process a claim run without a verifier, so they never need the params file.

use std::path::{Path, PathBuf};

use eyre::Context as _;
use tracing::info;
use zdrop_core::base::{AccountId, MapRoot, Nullifier};
use zdrop_core::schema::config::ClaimConfiguration;
use zdrop_core::schema::proof::ClaimProof;
use zdrop_runtime::{
    BalanceLedger, ClaimError, ClaimProcessor, ClaimReceipt, Halo2ClaimVerifier,
    RoundParameters, Sequencer, SledStore,
};

use super::io::read_json;
use super::params::{ParamsMode, load_or_prepare_params};

fn open_store(db: &Path) -> eyre::Result<SledStore> {
    SledStore::open(db)
        .with_context(|| format!("Failed to open state database {}", db.display()))
}

/// Read-only commands must not leave an empty database behind a mistyped path.
fn open_queries(db: &Path) -> eyre::Result<Sequencer<SledStore, (), BalanceLedger>> {
    let store = SledStore::open_existing(db)
        .with_context(|| format!("Failed to open state database {}", db.display()))?;
    Ok(Sequencer::new(store, ClaimProcessor::new((), BalanceLedger)))
}

fn rejected(err: ClaimError) -> eyre::Report {
    let hint = err.retry_hint();
    eyre::Report::new(err).wrap_err(format!("Operation rejected ({hint:?})"))
}

/// The round fixed in `store`, provided `config` names it.
fn published_round(
    store: &SledStore,
    config: &ClaimConfiguration,
) -> eyre::Result<RoundParameters> {
    let round = RoundParameters::load(store)?
        .ok_or_else(|| rejected(ClaimError::CommitmentUnset))?;
    round
        .ensure_matches(&RoundParameters::from(config))
        .map_err(rejected)?;
    Ok(round)
}

/// Publish the commitment from `config_file` as `sender`.
///
/// The first publication fixes the round described by the configuration. Later publications
/// must use a configuration for the same round.
///
/// # Errors
/// Returns an error if the database cannot be opened or the publication is rejected.
pub async fn state_publish(
    db: PathBuf,
    config_file: PathBuf,
    sender: AccountId,
) -> eyre::Result<MapRoot> {
    let config: ClaimConfiguration = read_json(&config_file, "claim configuration").await?;
    tokio::task::spawn_blocking(move || -> eyre::Result<MapRoot> {
        let sequencer = Sequencer::new(open_store(&db)?, ClaimProcessor::new((), BalanceLedger));
        sequencer
            .publish_round(
                &sender,
                config.commitment_root,
                &RoundParameters::from(&config),
            )
            .map_err(rejected)?;
        Ok(config.commitment_root)
    })
    .await?
}

/// Verify the claim proof in `proof_file` and apply it as `sender`.
///
/// The proof is verified against the published round's message and credited with its grant
/// amount. `config_file` only has to name that round.
///
/// # Errors
/// Returns an error if the database is missing, `config_file` names another round, params cannot
/// be loaded, or the claim is rejected. Rejections carry the processor's retry hint.
pub async fn state_submit(
    db: PathBuf,
    config_file: PathBuf,
    proof_file: PathBuf,
    params_file: PathBuf,
    sender: AccountId,
) -> eyre::Result<ClaimReceipt> {
    let config: ClaimConfiguration = read_json(&config_file, "claim configuration").await?;
    let proof: ClaimProof = read_json(&proof_file, "claim proof").await?;

    let (store, round) =
        tokio::task::spawn_blocking(move || -> eyre::Result<(SledStore, RoundParameters)> {
            let store = SledStore::open_existing(&db)
                .with_context(|| format!("Failed to open state database {}", db.display()))?;
            let round = published_round(&store, &config)?;
            Ok((store, round))
        })
        .await??;

    let params = load_or_prepare_params(params_file, ParamsMode::Require).await?;
    let verifier = Halo2ClaimVerifier::new(params, round.message.clone());
    let processor = round.processor(verifier, BalanceLedger);
    let receipt = tokio::task::spawn_blocking(move || -> eyre::Result<ClaimReceipt> {
        Sequencer::new(store, processor)
            .submit_claim(&sender, &proof)
            .map_err(rejected)
    })
    .await??;

    info!(
        %sender,
        nullifier = %receipt.nullifier,
        balance = receipt.balance,
        "Claim applied"
    );
    Ok(receipt)
}

/// The published commitment, if any.
///
/// # Errors
/// Returns an error if the database does not exist or cannot be read.
pub async fn state_commitment(db: PathBuf) -> eyre::Result<Option<MapRoot>> {
    tokio::task::spawn_blocking(move || -> eyre::Result<Option<MapRoot>> {
        Ok(open_queries(&db)?.commitment()?)
    })
    .await?
}

/// Whether `nullifier` has been used by an applied claim.
///
/// # Errors
/// Returns an error if the database does not exist or cannot be read.
pub async fn state_nullifier(db: PathBuf, nullifier: Nullifier) -> eyre::Result<bool> {
    tokio::task::spawn_blocking(move || -> eyre::Result<bool> {
        Ok(open_queries(&db)?.is_nullifier_used(&nullifier)?)
    })
    .await?
}

/// Balance of `account`.
///
/// # Errors
/// Returns an error if the database does not exist or cannot be read.
pub async fn state_balance(db: PathBuf, account: AccountId) -> eyre::Result<u64> {
    tokio::task::spawn_blocking(move || -> eyre::Result<u64> {
        Ok(open_queries(&db)?.balance(&account)?)
    })
    .await?
}
