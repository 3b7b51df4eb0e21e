//! Verify subcommands.

use std::path::PathBuf;

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_PARAMS_FILE, DEFAULT_PROOF_FILE, ZDROP_CONFIG_FILE,
    ZDROP_PARAMS_FILE, ZDROP_PROOF_FILE,
};

/// Verify command group.
#[derive(Debug, clap::Subcommand)]
pub enum VerifyCommands {
    /// Verify a claim proof against the claim configuration.
    Proof {
        /// Claim configuration file.
        #[arg(long, env = ZDROP_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Claim proof file.
        #[arg(long, env = ZDROP_PROOF_FILE, default_value = DEFAULT_PROOF_FILE)]
        proof: PathBuf,
        /// Claim circuit params file.
        #[arg(long, env = ZDROP_PARAMS_FILE, default_value = DEFAULT_PARAMS_FILE)]
        params: PathBuf,
    },
}
