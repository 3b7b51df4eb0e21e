//! Node hashing and empty-subtree roots.

#![allow(
    clippy::arithmetic_side_effects,
    reason = "Bit and byte offsets are bounded by the map depth"
)]

use std::sync::LazyLock;

use ff::{Field, PrimeField};
use halo2_gadgets::poseidon::primitives::{self as poseidon, ConstantLength, P128Pow5T3};
use pasta_curves::pallas;

/// Number of levels between a leaf and the root.
///
/// Keys are `pallas::Base` elements, whose canonical encodings fit in 255 bits.
pub const MAP_DEPTH: usize = 255;

/// Leaf value that marks a key as a member.
pub const MEMBER_VALUE: pallas::Base = pallas::Base::ONE;

/// Poseidon hash of two field elements, used for internal nodes and identity derivation.
#[must_use]
pub fn poseidon_hash(left: pallas::Base, right: pallas::Base) -> pallas::Base {
    poseidon::Hash::<_, P128Pow5T3, ConstantLength<2>, 3, 2>::init().hash([left, right])
}

/// Pre-computed empty roots for levels `0..=MAP_DEPTH`.
static EMPTY_ROOTS: LazyLock<Vec<pallas::Base>> = LazyLock::new(|| {
    let mut roots = Vec::with_capacity(MAP_DEPTH.saturating_add(1));
    let mut current = pallas::Base::ZERO;
    roots.push(current);
    for _ in 0..MAP_DEPTH {
        current = poseidon_hash(current, current);
        roots.push(current);
    }
    roots
});

/// Root of an empty subtree of the given height.
///
/// # Panics
/// Panics if `level > MAP_DEPTH`.
#[must_use]
pub fn empty_root(level: usize) -> pallas::Base {
    #[allow(
        clippy::indexing_slicing,
        reason = "Callers only pass levels within the map depth"
    )]
    EMPTY_ROOTS[level]
}

/// The `MAP_DEPTH` little-endian path bits of a key.
///
/// Bit `i` selects the direction at level `i`: `false` means the running node is the left child.
#[must_use]
pub fn key_bits(key: &pallas::Base) -> [bool; MAP_DEPTH] {
    let repr = key.to_repr();
    std::array::from_fn(|i| {
        let byte = repr.get(i / 8).copied().unwrap_or_default();
        (byte >> (i % 8)) & 1 == 1
    })
}

/// Parse canonical little-endian bytes into a field element.
#[must_use]
pub fn base_from_bytes(bytes: &[u8; 32]) -> Option<pallas::Base> {
    Option::from(pallas::Base::from_repr(*bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roots_chain_from_zero() {
        assert_eq!(empty_root(0), pallas::Base::ZERO);
        assert_eq!(
            empty_root(1),
            poseidon_hash(pallas::Base::ZERO, pallas::Base::ZERO)
        );
        assert_eq!(
            empty_root(MAP_DEPTH),
            poseidon_hash(empty_root(MAP_DEPTH - 1), empty_root(MAP_DEPTH - 1))
        );
    }

    #[test]
    fn hash_is_order_sensitive() {
        let a = pallas::Base::from(1);
        let b = pallas::Base::from(2);
        assert_ne!(poseidon_hash(a, b), poseidon_hash(b, a));
    }

    #[test]
    fn key_bits_are_little_endian() {
        let bits = key_bits(&pallas::Base::from(0b101));
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[2]);
        assert!(bits[3..].iter().all(|b| !b));
    }

    #[test]
    fn non_canonical_bytes_are_rejected() {
        assert_eq!(base_from_bytes(&[0xff; 32]), None);
        assert_eq!(
            base_from_bytes(&pallas::Base::from(7).to_repr()),
            Some(pallas::Base::from(7))
        );
    }
}
