//! Identity subcommands.

use std::path::PathBuf;

use super::constants::{DEFAULT_KEY_FILE, ZDROP_KEY_FILE, ZDROP_KEY_FORCE, ZDROP_KEY_OUT};

/// Key command group.
#[derive(Debug, clap::Subcommand)]
pub enum KeyCommands {
    /// Generate a new claim identity and write it owner-only.
    Generate {
        /// Output file for the identity.
        #[arg(long, env = ZDROP_KEY_OUT, default_value = DEFAULT_KEY_FILE)]
        out: PathBuf,
        /// Overwrite an existing identity file.
        #[arg(long, env = ZDROP_KEY_FORCE, default_value_t = false)]
        force: bool,
    },
    /// Print the public key and member key of an identity.
    Show {
        /// Identity file.
        #[arg(long, env = ZDROP_KEY_FILE, default_value = DEFAULT_KEY_FILE)]
        key: PathBuf,
    },
}
