//! Serialized schema/data contracts.

/// Claim configuration schema types.
pub mod config;
/// Public identity schema types.
pub mod identity;
/// Member list schema types.
pub mod members;
/// Claim proof schema types.
pub mod proof;
