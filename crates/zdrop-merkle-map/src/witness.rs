use pasta_curves::pallas;

use crate::node::{MAP_DEPTH, key_bits, poseidon_hash};

/// A sibling path from one key of the map up to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapWitness {
    key: pallas::Base,
    siblings: [pallas::Base; MAP_DEPTH],
}

impl MapWitness {
    /// Create a witness from a key and its siblings, leaf level first.
    #[must_use]
    pub const fn new(key: pallas::Base, siblings: [pallas::Base; MAP_DEPTH]) -> Self {
        Self { key, siblings }
    }

    /// Key this witness opens.
    #[must_use]
    pub const fn key(&self) -> pallas::Base {
        self.key
    }

    /// Sibling hashes, leaf level first.
    #[must_use]
    pub const fn siblings(&self) -> &[pallas::Base; MAP_DEPTH] {
        &self.siblings
    }

    /// Fold `value` up the path, returning the implied root together with the key.
    #[must_use]
    pub fn compute_root_and_key(&self, value: pallas::Base) -> (pallas::Base, pallas::Base) {
        let root = key_bits(&self.key)
            .iter()
            .zip(self.siblings.iter())
            .fold(value, |node, (is_right, sibling)| {
                if *is_right {
                    poseidon_hash(*sibling, node)
                } else {
                    poseidon_hash(node, *sibling)
                }
            });
        (root, self.key)
    }
}
