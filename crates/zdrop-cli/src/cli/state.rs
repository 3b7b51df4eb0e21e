//! Local state subcommands.

use std::path::PathBuf;

use zdrop_core::base::{AccountId, Nullifier};

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_PARAMS_FILE, DEFAULT_PROOF_FILE, DEFAULT_STATE_DB,
    ZDROP_CONFIG_FILE, ZDROP_PARAMS_FILE, ZDROP_PROOF_FILE, ZDROP_SENDER, ZDROP_STATE_DB,
};
use super::{parse_account, parse_nullifier};

/// Location of the state database.
#[derive(Debug, clap::Args)]
pub struct StateDbArgs {
    /// State database directory.
    #[arg(long, env = ZDROP_STATE_DB, default_value = DEFAULT_STATE_DB)]
    pub db: PathBuf,
}

/// State command group.
#[derive(Debug, clap::Subcommand)]
pub enum StateCommands {
    /// Publish the commitment from a claim configuration.
    ///
    /// The first publication fixes the round's message, grant amount and authority.
    Publish {
        #[command(flatten)]
        state: StateDbArgs,
        /// Claim configuration file.
        #[arg(long, env = ZDROP_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Publishing account (hex).
        #[arg(long, env = ZDROP_SENDER, value_parser = parse_account)]
        sender: AccountId,
    },
    /// Verify a claim proof and credit the sender.
    Submit {
        #[command(flatten)]
        state: StateDbArgs,
        /// Claim configuration file.
        #[arg(long, env = ZDROP_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Claim proof file.
        #[arg(long, env = ZDROP_PROOF_FILE, default_value = DEFAULT_PROOF_FILE)]
        proof: PathBuf,
        /// Claim circuit params file.
        #[arg(long, env = ZDROP_PARAMS_FILE, default_value = DEFAULT_PARAMS_FILE)]
        params: PathBuf,
        /// Account to credit (hex).
        #[arg(long, env = ZDROP_SENDER, value_parser = parse_account)]
        sender: AccountId,
    },
    /// Print the published commitment.
    Commitment {
        #[command(flatten)]
        state: StateDbArgs,
    },
    /// Print whether a nullifier has been used.
    Nullifier {
        #[command(flatten)]
        state: StateDbArgs,
        /// Nullifier (hex).
        #[arg(value_parser = parse_nullifier)]
        nullifier: Nullifier,
    },
    /// Print the balance of an account.
    Balance {
        #[command(flatten)]
        state: StateDbArgs,
        /// Account (hex).
        #[arg(value_parser = parse_account)]
        account: AccountId,
    },
}
