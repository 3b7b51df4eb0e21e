use halo2_proofs::plonk;
use thiserror::Error;

/// Errors for claim proof operations.
#[derive(Debug, Error)]
pub enum ClaimProofError {
    /// A 32-byte value was not a canonical encoding of a Pallas base field element.
    #[error("invalid canonical pallas base encoding")]
    NonCanonicalBase,
    /// The witness opens a different key than the identity's member key.
    #[error("map witness does not open the identity's member key")]
    KeyMismatch,
    /// A Halo2 error occurred while proving or verifying.
    #[error("halo2 error: {0}")]
    Halo2(#[from] plonk::Error),
    /// Key generation for the claim circuit failed.
    #[error("claim circuit keygen failed: {0}")]
    Keygen(#[source] plonk::Error),
    /// Internal key cache lock was poisoned.
    #[error("internal key cache lock poisoned")]
    CachePoisoned,
    /// Halo2 params `k` does not match the claim circuit.
    #[error("claim params k mismatch: expected {expected}, got {actual}")]
    InvalidParamsK { expected: u32, actual: u32 },
}

impl ClaimProofError {
    /// Whether the error is a verdict on the proof itself.
    ///
    /// `false` means the verifier could not reach a verdict (bad params, keygen failure, a
    /// poisoned cache), so the same proof may still verify on a healthy verifier.
    #[must_use]
    pub const fn is_invalid_proof(&self) -> bool {
        matches!(self, Self::NonCanonicalBase | Self::Halo2(_))
    }
}
