//! JSON file helpers shared by the commands.

use std::path::Path;

use eyre::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Read and parse a JSON file; `what` names the file in error messages.
pub(super) async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> eyre::Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what} {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {what} JSON"))
}

/// Pretty-print `value` as JSON into `path`.
pub(super) async fn write_json<T: Serialize>(path: &Path, value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
