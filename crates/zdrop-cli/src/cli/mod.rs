//! Command-line interface for the `zdrop` CLI application.

#[cfg(feature = "prove")]
mod claim;
mod commitment;
mod config;
pub mod constants;
mod key;
mod setup;
mod state;
mod verify;

use clap::Parser;
use eyre::{Result, ensure, eyre};
use zdrop_core::base::{AccountId, Nullifier};
use zdrop_sdk::commands::ParamsMode;

#[cfg(feature = "prove")]
pub use self::claim::ClaimCommands;
pub use self::commitment::CommitmentCommands;
pub use self::config::ConfigCommands;
pub use self::key::KeyCommands;
pub use self::setup::SetupCommands;
pub use self::state::StateCommands;
pub use self::verify::VerifyCommands;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "zdrop")]
#[command(about = "Anonymous one-time airdrop claims")]
pub struct Cli {
    /// CLI top-level command group.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Claim identity utilities.
    Key {
        /// Key subcommands.
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Setup utilities (organizer/developer focused).
    Setup {
        /// Setup subcommands.
        #[command(subcommand)]
        command: SetupCommands,
    },
    /// Member map commitment utilities.
    Commitment {
        /// Commitment subcommands.
        #[command(subcommand)]
        command: CommitmentCommands,
    },
    /// Claim commands.
    #[cfg(feature = "prove")]
    Claim {
        /// Claim subcommands.
        #[command(subcommand)]
        command: ClaimCommands,
    },
    /// Verification commands.
    Verify {
        /// Verify subcommands.
        #[command(subcommand)]
        command: VerifyCommands,
    },
    /// Local claim state.
    State {
        /// State subcommands.
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Claim configuration utilities.
    Config {
        /// Config subcommands.
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

pub fn parse_params_mode(s: &str) -> Result<ParamsMode> {
    match s {
        "require" => Ok(ParamsMode::Require),
        "auto" => Ok(ParamsMode::Auto),
        other => Err(eyre!(
            "Invalid params mode: {other}. Expected 'require' or 'auto'."
        )),
    }
}

pub fn parse_account(s: &str) -> Result<AccountId> {
    s.parse()
        .map_err(|e| eyre!("Invalid account: {e}. Expected 32 bytes of hex."))
}

pub fn parse_nullifier(s: &str) -> Result<Nullifier> {
    s.parse()
        .map_err(|e| eyre!("Invalid nullifier: {e}. Expected 32 bytes of hex."))
}

pub fn parse_grant_amount(s: &str) -> Result<u64> {
    let amount: u64 = s.parse().map_err(|e| eyre!("Invalid grant amount: {e}"))?;
    ensure!(amount > 0, "Grant amount must be positive");
    Ok(amount)
}

pub fn parse_message(s: &str) -> Result<String> {
    ensure!(!s.is_empty(), "Claim message must not be empty");
    Ok(s.to_owned())
}
