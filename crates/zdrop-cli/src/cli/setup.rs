//! Setup subcommands.

use std::path::PathBuf;

use super::constants::{DEFAULT_PARAMS_FILE, ZDROP_PARAMS_OUT};

/// Setup command group.
#[derive(Debug, clap::Subcommand)]
pub enum SetupCommands {
    /// Generate Halo2 params for the claim circuit.
    Params {
        /// Output file for the params.
        #[arg(long, env = ZDROP_PARAMS_OUT, default_value = DEFAULT_PARAMS_FILE)]
        out: PathBuf,
    },
}
