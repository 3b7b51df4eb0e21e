//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Common
pub const ZDROP_CONFIG_FILE: &str = "ZDROP_CONFIG_FILE";
pub const ZDROP_MEMBERS_FILE: &str = "ZDROP_MEMBERS_FILE";
pub const ZDROP_KEY_FILE: &str = "ZDROP_KEY_FILE";
pub const ZDROP_PROOF_FILE: &str = "ZDROP_PROOF_FILE";

// Params
pub const ZDROP_PARAMS_FILE: &str = "ZDROP_PARAMS_FILE";
pub const ZDROP_PARAMS_MODE: &str = "ZDROP_PARAMS_MODE";
pub const ZDROP_PARAMS_OUT: &str = "ZDROP_PARAMS_OUT";

// Key
pub const ZDROP_KEY_OUT: &str = "ZDROP_KEY_OUT";
pub const ZDROP_KEY_FORCE: &str = "ZDROP_KEY_FORCE";

// Commitment
pub const ZDROP_MESSAGE: &str = "ZDROP_MESSAGE";
pub const ZDROP_GRANT_AMOUNT: &str = "ZDROP_GRANT_AMOUNT";
pub const ZDROP_AUTHORITY: &str = "ZDROP_AUTHORITY";
pub const ZDROP_CONFIG_OUT: &str = "ZDROP_CONFIG_OUT";

// Claim
pub const ZDROP_PROOF_OUT: &str = "ZDROP_PROOF_OUT";

// State
pub const ZDROP_STATE_DB: &str = "ZDROP_STATE_DB";
pub const ZDROP_SENDER: &str = "ZDROP_SENDER";

// -------------------------
// Default values
// -------------------------

// File paths
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_MEMBERS_FILE: &str = "members.json";
pub const DEFAULT_KEY_FILE: &str = "identity.json";
pub const DEFAULT_PROOF_FILE: &str = "claim-proof.json";
pub const DEFAULT_PARAMS_FILE: &str = "setup-claim-params.bin";
pub const DEFAULT_STATE_DB: &str = "zdrop-state";

// Parsed values
pub const DEFAULT_PARAMS_MODE: &str = "auto";
