//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

#[cfg(feature = "prove")]
mod claim;
mod commitment;
mod io;
mod key;
mod params;
mod state;
mod verify;

#[cfg(feature = "prove")]
pub use claim::claim_prove;
pub use commitment::{build_commitment, build_member_map};
pub use key::{key_generate, key_show, read_spending_key};
pub use params::{ParamsMode, generate_params_file, load_or_prepare_params};
pub use state::{state_balance, state_commitment, state_nullifier, state_publish, state_submit};
pub use verify::verify_claim;

/// Generates and prints the JSON schema for the `ClaimConfiguration` struct.
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn claim_configuration_schema() -> eyre::Result<()> {
    let schema = schemars::schema_for!(zdrop_core::schema::config::ClaimConfiguration);
    let schema_str = serde_json::to_string_pretty(&schema)?;
    println!("Claim Configuration JSON Schema:\n{schema_str}");
    Ok(())
}
