//! Sparse storage for the member map.
//!
//! Only nodes that differ from the empty root of their level are stored. A node at level `l` is
//! addressed by the key shifted right by `l` bits, so every key owns exactly one node per level.

#![allow(
    clippy::arithmetic_side_effects,
    reason = "Levels are bounded by MAP_DEPTH"
)]

use std::collections::HashMap;

use ff::{Field, PrimeField};
use pasta_curves::pallas;
use zdrop_core::base::{MapRoot, MemberKey};

use crate::error::MapError;
use crate::node::{MAP_DEPTH, MEMBER_VALUE, base_from_bytes, empty_root, poseidon_hash};
use crate::witness::MapWitness;

type NodeIndex = [u8; 32];

/// Sparse depth-255 Merkle map from field keys to field values.
#[derive(Debug, Clone)]
pub struct MerkleMap {
    leaves: HashMap<NodeIndex, pallas::Base>,
    nodes: HashMap<(usize, NodeIndex), pallas::Base>,
    root: pallas::Base,
}

impl Default for MerkleMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MerkleMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leaves: HashMap::new(),
            nodes: HashMap::new(),
            root: empty_root(MAP_DEPTH),
        }
    }

    /// Build a map with every listed key set to [`MEMBER_VALUE`].
    ///
    /// # Errors
    /// Returns an error if a key is not a canonical field encoding or is listed twice.
    pub fn from_member_keys<'a, I>(keys: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = &'a MemberKey>,
    {
        let mut map = Self::new();
        for (index, key) in keys.into_iter().enumerate() {
            let field = base_from_bytes(key.as_bytes())
                .ok_or(MapError::NonCanonicalKey { key: *key, index })?;
            if !map.insert_member(field) {
                return Err(MapError::DuplicateMember(*key));
            }
        }
        Ok(map)
    }

    /// Set the value at `key`, returning the previous value.
    ///
    /// Setting a key to zero is the same as removing it.
    pub fn insert(&mut self, key: pallas::Base, value: pallas::Base) -> pallas::Base {
        let index = key.to_repr();
        let previous = if value.is_zero_vartime() {
            self.leaves.remove(&index)
        } else {
            self.leaves.insert(index, value)
        };
        self.update_path(index, value);
        previous.unwrap_or(pallas::Base::ZERO)
    }

    /// Mark `key` as a member. Returns `false` if it already was one.
    pub fn insert_member(&mut self, key: pallas::Base) -> bool {
        self.insert(key, MEMBER_VALUE) != MEMBER_VALUE
    }

    /// Clear the value at `key`, returning the previous value.
    pub fn remove(&mut self, key: pallas::Base) -> pallas::Base {
        self.insert(key, pallas::Base::ZERO)
    }

    /// Value stored at `key`, zero if unset.
    #[must_use]
    pub fn get(&self, key: &pallas::Base) -> pallas::Base {
        self.leaves
            .get(&key.to_repr())
            .copied()
            .unwrap_or(pallas::Base::ZERO)
    }

    /// Whether `key` holds [`MEMBER_VALUE`].
    #[must_use]
    pub fn is_member(&self, key: &pallas::Base) -> bool {
        self.get(key) == MEMBER_VALUE
    }

    /// Current root.
    #[must_use]
    pub const fn root(&self) -> pallas::Base {
        self.root
    }

    /// Current root as canonical bytes.
    #[must_use]
    pub fn root_bytes(&self) -> MapRoot {
        MapRoot::new(self.root.to_repr())
    }

    /// Number of non-empty leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether no leaf is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Sibling path for `key`, valid for the current root.
    ///
    /// Witnesses exist for every key, set or not. Recomputing with the wrong leaf value yields a
    /// different root.
    #[must_use]
    pub fn witness(&self, key: pallas::Base) -> MapWitness {
        let mut index = key.to_repr();
        let siblings = std::array::from_fn(|level| {
            let sibling = self.node(level, sibling_of(index));
            index = parent_of(index);
            sibling
        });
        MapWitness::new(key, siblings)
    }

    fn node(&self, level: usize, index: NodeIndex) -> pallas::Base {
        let stored = if level == 0 {
            self.leaves.get(&index)
        } else {
            self.nodes.get(&(level, index))
        };
        stored.copied().unwrap_or_else(|| empty_root(level))
    }

    fn update_path(&mut self, mut index: NodeIndex, leaf: pallas::Base) {
        let mut current = leaf;
        for level in 0..MAP_DEPTH {
            let sibling = self.node(level, sibling_of(index));
            current = if is_right_child(index) {
                poseidon_hash(sibling, current)
            } else {
                poseidon_hash(current, sibling)
            };
            index = parent_of(index);

            let parent_level = level + 1;
            if parent_level == MAP_DEPTH {
                break;
            }
            if current == empty_root(parent_level) {
                self.nodes.remove(&(parent_level, index));
            } else {
                self.nodes.insert((parent_level, index), current);
            }
        }
        self.root = current;
    }
}

const fn is_right_child(index: NodeIndex) -> bool {
    index[0] & 1 == 1
}

const fn sibling_of(mut index: NodeIndex) -> NodeIndex {
    index[0] ^= 1;
    index
}

fn parent_of(index: NodeIndex) -> NodeIndex {
    let mut parent = [0u8; 32];
    for (i, byte) in parent.iter_mut().enumerate() {
        let low = index.get(i).copied().unwrap_or_default() >> 1;
        let high = index.get(i + 1).copied().unwrap_or_default() << 7;
        *byte = low | high;
    }
    parent
}
