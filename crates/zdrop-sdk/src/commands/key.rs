//! Claim identity files.
//!
//! An identity file holds the spending key next to the public values derived from it. It is the
//! only file a recipient must keep secret, so it is always written owner-only.

use std::io;
use std::path::{Path, PathBuf};

use eyre::{Context as _, ensure};
use rand_core::OsRng;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt as _;
use tracing::info;
use zdrop_circuit::SpendingKey;
use zdrop_core::schema::identity::PublicIdentity;
use zeroize::{Zeroize as _, Zeroizing};

use super::params::tmp_path;

#[derive(Serialize, Deserialize)]
struct IdentityFile {
    spending_key: String,
    #[serde(flatten)]
    public: PublicIdentity,
}

impl Drop for IdentityFile {
    fn drop(&mut self) {
        self.spending_key.zeroize();
    }
}

fn public_identity(sk: &SpendingKey) -> PublicIdentity {
    PublicIdentity {
        public_key: sk.public_key_bytes(),
        member_key: sk.member_key_bytes(),
    }
}

fn parse_spending_key(hex_key: &SecretString) -> eyre::Result<SpendingKey> {
    let bytes = Zeroizing::new(
        hex::decode(hex_key.expose_secret().trim()).context("Spending key is not valid hex")?,
    );
    let bytes: &[u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| eyre::eyre!("Spending key must be 32 bytes, got {}", bytes.len()))?;
    SpendingKey::from_bytes(bytes).ok_or_else(|| eyre::eyre!("Spending key is not canonical"))
}

/// Write an identity file owner-only, replacing `path` in one step.
///
/// The JSON goes to a fresh `0o600` staging file, which is synced and then renamed over `path`,
/// so the mode of an earlier file at `path` does not carry over.
async fn write_identity_file(path: &Path, json: &str) -> eyre::Result<()> {
    let staging = tmp_path(path);
    match tokio::fs::remove_file(&staging).await {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            return Err(err)
                .with_context(|| format!("Failed to remove stale {}", staging.display()));
        }
        _ => {}
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options
        .open(&staging)
        .await
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    file.write_all(json.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    if let Err(err) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(err)
            .with_context(|| format!("Failed to move identity into {}", path.display()));
    }
    Ok(())
}

/// Read the spending key from an identity file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if its public values were not
/// derived from its spending key.
pub async fn read_spending_key(path: &Path) -> eyre::Result<SpendingKey> {
    let text = Zeroizing::new(
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read identity file {}", path.display()))?,
    );
    let mut file: IdentityFile =
        serde_json::from_str(&text).context("Failed to parse identity file JSON")?;
    let secret = SecretString::new(std::mem::take(&mut file.spending_key).into_boxed_str());
    let sk = parse_spending_key(&secret)?;

    ensure!(
        public_identity(&sk) == file.public,
        "Identity file {} is inconsistent: public values do not match the spending key",
        path.display()
    );
    Ok(sk)
}

/// Generate a new identity and write it to `output`.
///
/// # Errors
/// Returns an error if `output` exists and `force` is not set, or if writing fails.
pub async fn key_generate(output: PathBuf, force: bool) -> eyre::Result<PublicIdentity> {
    if !force {
        ensure!(
            !tokio::fs::try_exists(&output).await?,
            "{} already exists; pass --force to overwrite it",
            output.display()
        );
    }

    info!(file = ?output, "Generating identity...");
    let sk = SpendingKey::random(OsRng);
    let file = IdentityFile {
        spending_key: hex::encode(sk.to_bytes()),
        public: public_identity(&sk),
    };
    let json = Zeroizing::new(format!("{}\n", serde_json::to_string_pretty(&file)?));
    write_identity_file(&output, &json).await?;

    info!(
        file = ?output,
        public_key = %file.public.public_key,
        "Identity written"
    );
    Ok(file.public)
}

/// Print the public half of the identity in `key_file`.
///
/// # Errors
/// Returns an error if the identity file cannot be read.
#[allow(clippy::print_stdout, reason = "Prints the public identity to stdout")]
pub async fn key_show(key_file: PathBuf) -> eyre::Result<PublicIdentity> {
    let sk = read_spending_key(&key_file).await?;
    let identity = public_identity(&sk);
    println!("{}", serde_json::to_string_pretty(&identity)?);
    Ok(identity)
}
