//! Sparse Merkle map over the Pallas base field.
//!
//! The map is a depth-255 binary tree addressed by the little-endian bits of a field element key.
//! Internal nodes are `Poseidon(left, right)` and the empty leaf is zero, so an empty subtree of
//! any height has a fixed, precomputed root.

mod error;
mod map;
mod node;
mod witness;

pub use error::MapError;
pub use map::MerkleMap;
pub use node::{MAP_DEPTH, MEMBER_VALUE, base_from_bytes, empty_root, key_bits, poseidon_hash};
pub use witness::MapWitness;
