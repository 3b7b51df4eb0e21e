//! Fixed-width byte encodings of field elements and account identifiers.
//!
//! Every value here is the canonical 32-byte little-endian encoding produced by the proving
//! side. Canonicity is checked where the bytes are turned back into field elements, not here.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;
use thiserror::Error;

/// Size in bytes of every encoded field element.
pub const FIELD_BYTES: usize = 32;

/// Errors returned when parsing a hex-encoded 32-byte value.
#[derive(Debug, Error, PartialEq)]
pub enum ParseBytesError {
    /// The input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The decoded input had the wrong length.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Decoded length.
        actual: usize,
    },
}

macro_rules! field_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(
            #[serde_as(as = "Hex")]
            #[schemars(with = "String")]
            [u8; FIELD_BYTES],
        );

        impl $name {
            /// Wrap raw bytes.
            #[must_use]
            pub const fn new(bytes: [u8; FIELD_BYTES]) -> Self {
                Self(bytes)
            }

            /// Copy out the raw bytes.
            #[must_use]
            pub const fn to_bytes(self) -> [u8; FIELD_BYTES] {
                self.0
            }

            /// Borrow the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
                &self.0
            }
        }

        impl From<[u8; FIELD_BYTES]> for $name {
            fn from(bytes: [u8; FIELD_BYTES]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; FIELD_BYTES] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<[u8; FIELD_BYTES]> for $name {
            fn as_ref(&self) -> &[u8; FIELD_BYTES] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = ParseBytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex_32(s).map(Self)
            }
        }
    };
}

field_bytes!(
    /// Root of the member map, i.e. the published commitment.
    MapRoot
);

field_bytes!(
    /// One-time claim tag derived from a spending key and the claim message.
    Nullifier
);

field_bytes!(
    /// Key of a member leaf in the member map.
    MemberKey
);

field_bytes!(
    /// Public key of a claim identity.
    PublicKeyBytes
);

field_bytes!(
    /// Identity of a ledger account, as authenticated by the execution environment.
    AccountId
);

fn parse_hex_32(s: &str) -> Result<[u8; FIELD_BYTES], ParseBytesError> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(trimmed)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| ParseBytesError::InvalidLength {
        expected: FIELD_BYTES,
        actual,
    })
}
