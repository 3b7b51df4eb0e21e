//! Claim identities and nullifier derivation.
//!
//! A spending key `sk` is a random `pallas::Base` element. From it:
//! - the public key is `Poseidon(sk, 1)`,
//! - the member key, i.e. the map position of the identity, is `Poseidon(pk, 2)`,
//! - the nullifier for a claim message `m` is `Poseidon(sk, m)`.
//!
//! The claim message is derived from an arbitrary string with a personalised BLAKE2b hash
//! reduced into the field, so it never coincides with the small domain tags above.

use std::fmt;

use ff::{Field, FromUniformBytes, PrimeField};
use pasta_curves::pallas;
use rand_core::RngCore;
use zdrop_core::base::{MemberKey, Nullifier, PublicKeyBytes};
use zdrop_merkle_map::{base_from_bytes, poseidon_hash};

/// Domain tag for `pk = Poseidon(sk, PUBLIC_KEY_DOMAIN)`.
pub const PUBLIC_KEY_DOMAIN: u64 = 1;

/// Domain tag for `key = Poseidon(pk, MEMBER_KEY_DOMAIN)`.
pub const MEMBER_KEY_DOMAIN: u64 = 2;

/// BLAKE2b personalization for claim messages.
pub const CLAIM_MESSAGE_PERSONALIZATION: &[u8; 16] = b"zdrop_ClaimMsg__";

/// Secret half of a claim identity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SpendingKey(pallas::Base);

impl SpendingKey {
    /// Sample a fresh spending key.
    pub fn random(rng: impl RngCore) -> Self {
        Self(pallas::Base::random(rng))
    }

    /// Parse a spending key from its canonical encoding.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        base_from_bytes(bytes).map(Self)
    }

    /// Canonical encoding of the key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_repr()
    }

    /// The key as a field element.
    #[must_use]
    pub const fn inner(&self) -> pallas::Base {
        self.0
    }

    /// Public key of this identity.
    #[must_use]
    pub fn public_key(&self) -> pallas::Base {
        public_key(self.0)
    }

    /// Member map key of this identity.
    #[must_use]
    pub fn member_key(&self) -> pallas::Base {
        member_key(self.public_key())
    }

    /// Nullifier of this identity for the given claim message.
    #[must_use]
    pub fn nullifier(&self, message: pallas::Base) -> pallas::Base {
        nullifier(self.0, message)
    }

    /// Public key encoded as bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> PublicKeyBytes {
        PublicKeyBytes::new(self.public_key().to_repr())
    }

    /// Member key encoded as bytes.
    #[must_use]
    pub fn member_key_bytes(&self) -> MemberKey {
        MemberKey::new(self.member_key().to_repr())
    }

    /// Nullifier encoded as bytes.
    #[must_use]
    pub fn nullifier_bytes(&self, message: pallas::Base) -> Nullifier {
        Nullifier::new(self.nullifier(message).to_repr())
    }
}

impl fmt::Debug for SpendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpendingKey(<redacted>)")
    }
}

/// `Poseidon(sk, 1)`.
#[must_use]
pub fn public_key(sk: pallas::Base) -> pallas::Base {
    poseidon_hash(sk, pallas::Base::from(PUBLIC_KEY_DOMAIN))
}

/// `Poseidon(pk, 2)`.
#[must_use]
pub fn member_key(pk: pallas::Base) -> pallas::Base {
    poseidon_hash(pk, pallas::Base::from(MEMBER_KEY_DOMAIN))
}

/// Member key for a public key given as bytes, `None` if the bytes are not canonical.
#[must_use]
pub fn member_key_from_public_key(pk: &PublicKeyBytes) -> Option<MemberKey> {
    base_from_bytes(pk.as_bytes()).map(|pk| MemberKey::new(member_key(pk).to_repr()))
}

/// `Poseidon(sk, m)`.
#[must_use]
pub fn nullifier(sk: pallas::Base, message: pallas::Base) -> pallas::Base {
    poseidon_hash(sk, message)
}

/// Hash a claim message string into the field.
#[must_use]
pub fn claim_message(message: &str) -> pallas::Base {
    let digest = blake2b_simd::Params::new()
        .hash_length(64)
        .personal(CLAIM_MESSAGE_PERSONALIZATION)
        .hash(message.as_bytes());
    let mut wide = [0u8; 64];
    wide.copy_from_slice(digest.as_bytes());
    pallas::Base::from_uniform_bytes(&wide)
}
