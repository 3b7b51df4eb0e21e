//! Commitment subcommands.

use std::path::PathBuf;

use zdrop_core::base::AccountId;
use zdrop_core::schema::config::DEFAULT_GRANT_AMOUNT;

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_MEMBERS_FILE, ZDROP_AUTHORITY, ZDROP_CONFIG_OUT,
    ZDROP_GRANT_AMOUNT, ZDROP_MEMBERS_FILE, ZDROP_MESSAGE,
};
use super::{parse_account, parse_grant_amount, parse_message};

/// Arguments for `commitment build`.
#[derive(Debug, clap::Args)]
pub struct CommitmentBuildArgs {
    /// Member list JSON file.
    #[arg(long, env = ZDROP_MEMBERS_FILE, default_value = DEFAULT_MEMBERS_FILE)]
    pub members: PathBuf,
    /// Claim message nullifiers are bound to. Use a new message for every round.
    #[arg(long, env = ZDROP_MESSAGE, value_parser = parse_message)]
    pub message: String,
    /// Amount credited per successful claim.
    #[arg(
        long,
        env = ZDROP_GRANT_AMOUNT,
        default_value_t = DEFAULT_GRANT_AMOUNT,
        value_parser = parse_grant_amount
    )]
    pub grant_amount: u64,
    /// Only this account (hex) may publish the commitment. Anyone may publish when omitted.
    #[arg(long, env = ZDROP_AUTHORITY, value_parser = parse_account)]
    pub authority: Option<AccountId>,
    /// Configuration output file.
    #[arg(long, env = ZDROP_CONFIG_OUT, default_value = DEFAULT_CONFIG_FILE)]
    pub config_out: PathBuf,
}

/// Commitment command group.
#[derive(Debug, clap::Subcommand)]
pub enum CommitmentCommands {
    /// Build the member map from a member list and write the claim configuration.
    Build {
        #[command(flatten)]
        args: CommitmentBuildArgs,
    },
}
