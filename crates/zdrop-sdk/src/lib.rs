//! Zdrop SDK.
//!
//! File-based workflows behind the `zdrop` CLI: identities, params, commitments, claim proofs
//! and a local `sled`-backed claim state.

pub mod commands;
