//! Halo2 params file management for the claim circuit.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::Context as _;
use halo2_proofs::poly::commitment::Params;
use pasta_curves::vesta;
use tracing::info;
use zdrop_proofs::K_CLAIM;

/// What to do when the params file is missing or was generated for another `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsMode {
    /// Fail.
    Require,
    /// Generate fresh params and write them to the file.
    Auto,
}

/// Per-process staging name next to `path`.
pub(super) fn tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("zdrop-output");
    path.with_file_name(format!("{file_name}.tmp.{}", std::process::id()))
}

fn read_params(bytes: Vec<u8>) -> eyre::Result<Params<vesta::Affine>> {
    let mut cursor = Cursor::new(bytes);
    Params::<vesta::Affine>::read(&mut cursor).context("Failed to read claim params")
}

/// Generate params and move them into place.
///
/// The file is written under a temporary name first so readers never see a partial file. When
/// `overwrite` is false and another process created `params_file` meanwhile, theirs is kept.
fn write_params_file(params_file: &Path, overwrite: bool) -> eyre::Result<Params<vesta::Affine>> {
    if let Some(parent) = params_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp_file = tmp_path(params_file);
    let params = Params::<vesta::Affine>::new(K_CLAIM);

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_file)
        .with_context(|| format!("Failed to create {}", tmp_file.display()))?;
    params
        .write(&mut file)
        .with_context(|| format!("Failed to write {}", tmp_file.display()))?;

    if let Err(err) = std::fs::rename(&tmp_file, params_file) {
        if !params_file.exists() {
            return Err(err).with_context(|| {
                format!(
                    "Failed to rename {} -> {}",
                    tmp_file.display(),
                    params_file.display()
                )
            });
        }
        if overwrite {
            // `rename` does not replace an existing file on every platform.
            std::fs::remove_file(params_file).with_context(|| {
                format!("Failed to remove existing params {}", params_file.display())
            })?;
            std::fs::rename(&tmp_file, params_file).with_context(|| {
                format!(
                    "Failed to rename {} -> {}",
                    tmp_file.display(),
                    params_file.display()
                )
            })?;
        } else {
            let _ = std::fs::remove_file(&tmp_file);
        }
    }

    Ok(params)
}

/// Generate claim circuit params and overwrite `params_file`.
///
/// # Errors
/// Returns an error if generation or file I/O fails.
pub async fn generate_params_file(params_file: PathBuf) -> eyre::Result<()> {
    info!(file = ?params_file, k = K_CLAIM, "Generating claim params...");
    let file = params_file.clone();
    tokio::task::spawn_blocking(move || write_params_file(&file, true).map(|_| ())).await??;
    info!(file = ?params_file, "Claim params written");
    Ok(())
}

/// Load claim params from `params_file`, generating them first if `mode` allows it.
///
/// # Errors
/// Returns an error if the file is missing or has the wrong `k` in [`ParamsMode::Require`], or if
/// reading or generation fails.
pub async fn load_or_prepare_params(
    params_file: PathBuf,
    mode: ParamsMode,
) -> eyre::Result<Arc<Params<vesta::Affine>>> {
    if tokio::fs::try_exists(&params_file).await? {
        let bytes = tokio::fs::read(&params_file)
            .await
            .with_context(|| format!("Failed to read {}", params_file.display()))?;
        let params = tokio::task::spawn_blocking(move || read_params(bytes)).await??;
        let actual_k = params.k();
        if actual_k == K_CLAIM {
            return Ok(Arc::new(params));
        }

        match mode {
            ParamsMode::Require => eyre::bail!(
                "Claim params at {} have k = {actual_k}, expected {K_CLAIM}. Regenerate them with `zdrop setup params` or point --params elsewhere.",
                params_file.display(),
            ),
            ParamsMode::Auto => {
                info!(file = ?params_file, expected_k = K_CLAIM, actual_k, "Claim params have the wrong k; regenerating");
                let params =
                    tokio::task::spawn_blocking(move || write_params_file(&params_file, true))
                        .await??;
                return Ok(Arc::new(params));
            }
        }
    }

    match mode {
        ParamsMode::Require => eyre::bail!(
            "Claim params not found at {}. Run `zdrop setup params` (or pass `--params-mode auto`) and retry.",
            params_file.display(),
        ),
        ParamsMode::Auto => {
            info!(file = ?params_file, k = K_CLAIM, "Claim params not found; generating");
            let params =
                tokio::task::spawn_blocking(move || write_params_file(&params_file, false))
                    .await??;
            Ok(Arc::new(params))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn require_mode_fails_without_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.bin");
        let err = load_or_prepare_params(path, ParamsMode::Require)
            .await
            .expect_err("missing params");
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn require_mode_rejects_wrong_k() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.bin");
        let mut bytes = Vec::new();
        Params::<vesta::Affine>::new(4)
            .write(&mut bytes)
            .expect("serialize params");
        std::fs::write(&path, bytes).expect("write params");

        let err = load_or_prepare_params(path, ParamsMode::Require)
            .await
            .expect_err("wrong k");
        assert!(err.to_string().contains("expected 14"));
    }

    #[test]
    fn tmp_path_stays_next_to_target() {
        let tmp = tmp_path(Path::new("/data/claim.bin"));
        assert_eq!(tmp.parent(), Some(Path::new("/data")));
        assert!(
            tmp.file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with("claim.bin.tmp."))
        );
    }
}
