//! Claim subcommands.

use std::path::PathBuf;

use zdrop_sdk::commands::ParamsMode;

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_KEY_FILE, DEFAULT_MEMBERS_FILE, DEFAULT_PARAMS_FILE,
    DEFAULT_PARAMS_MODE, DEFAULT_PROOF_FILE, ZDROP_CONFIG_FILE, ZDROP_KEY_FILE,
    ZDROP_MEMBERS_FILE, ZDROP_PARAMS_FILE, ZDROP_PARAMS_MODE, ZDROP_PROOF_OUT,
};
use super::parse_params_mode;

/// Arguments for `claim prove`.
#[derive(Debug, clap::Args)]
pub struct ClaimProveArgs {
    /// Claim configuration file.
    #[arg(long, env = ZDROP_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Member list the configuration was built from.
    #[arg(long, env = ZDROP_MEMBERS_FILE, default_value = DEFAULT_MEMBERS_FILE)]
    pub members: PathBuf,
    /// Identity file of the claimant.
    #[arg(long, env = ZDROP_KEY_FILE, default_value = DEFAULT_KEY_FILE)]
    pub key: PathBuf,
    /// Claim circuit params file.
    #[arg(long, env = ZDROP_PARAMS_FILE, default_value = DEFAULT_PARAMS_FILE)]
    pub params: PathBuf,
    /// What to do when the params file is missing: `require` or `auto`.
    #[arg(
        long,
        env = ZDROP_PARAMS_MODE,
        default_value = DEFAULT_PARAMS_MODE,
        value_parser = parse_params_mode
    )]
    pub params_mode: ParamsMode,
    /// Output file for the claim proof.
    #[arg(long, env = ZDROP_PROOF_OUT, default_value = DEFAULT_PROOF_FILE)]
    pub proof_out: PathBuf,
}

/// Claim command group.
#[derive(Debug, clap::Subcommand)]
pub enum ClaimCommands {
    /// Prove membership and write a claim proof.
    Prove {
        #[command(flatten)]
        args: ClaimProveArgs,
    },
}
