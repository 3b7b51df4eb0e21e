//! Claim proof verification seam.

use std::error::Error;
use std::sync::Arc;

use halo2_proofs::poly::commitment::Params;
use pasta_curves::vesta;
use zdrop_core::schema::proof::ClaimProof;
use zdrop_proofs::ClaimProofError;

/// Checks that a claim proof is valid for its own public root and nullifier.
pub trait ClaimVerifier {
    /// Verification failure.
    type Error: Error + Send + Sync + 'static;

    /// Verify `proof`.
    ///
    /// # Errors
    /// Returns an error if the proof does not verify.
    fn verify(&self, proof: &ClaimProof) -> Result<(), Self::Error>;

    /// Whether `error` says the proof is bad, as opposed to the verifier being unable to judge
    /// it.
    fn rejects_proof(_error: &Self::Error) -> bool {
        true
    }
}

/// Halo2 verifier for one claim message.
#[derive(Debug, Clone)]
pub struct Halo2ClaimVerifier {
    params: Arc<Params<vesta::Affine>>,
    message: String,
}

impl Halo2ClaimVerifier {
    /// Verifier for proofs bound to `message`.
    pub fn new(params: Arc<Params<vesta::Affine>>, message: impl Into<String>) -> Self {
        Self {
            params,
            message: message.into(),
        }
    }

    /// The claim message proofs are checked against.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ClaimVerifier for Halo2ClaimVerifier {
    type Error = ClaimProofError;

    fn verify(&self, proof: &ClaimProof) -> Result<(), Self::Error> {
        zdrop_proofs::verify_claim_proof(&self.params, proof, &self.message)
    }

    fn rejects_proof(error: &Self::Error) -> bool {
        error.is_invalid_proof()
    }
}

#[cfg(test)]
mod tests {
    use zdrop_core::base::{MapRoot, Nullifier};

    use super::*;
    use crate::error::{ClaimError, RetryHint};
    use crate::ledger::BalanceLedger;
    use crate::processor::ClaimProcessor;

    #[test]
    fn params_of_the_wrong_size_are_a_verifier_fault() {
        let verifier = Halo2ClaimVerifier::new(Arc::new(Params::new(1)), "round-1");
        let proof = ClaimProof::new(vec![0; 8], MapRoot::default(), Nullifier::default());

        let err = ClaimProcessor::new(verifier, BalanceLedger)
            .verify(&proof)
            .unwrap_err();
        assert!(matches!(err, ClaimError::VerifierFault(_)));
        assert_eq!(err.retry_hint(), RetryHint::Fatal);
    }

    #[test]
    fn non_canonical_public_input_is_an_invalid_proof() {
        let verifier = Halo2ClaimVerifier::new(Arc::new(Params::new(1)), "round-1");
        let proof = ClaimProof::new(vec![0; 8], MapRoot::new([0xff; 32]), Nullifier::default());

        let err = ClaimProcessor::new(verifier, BalanceLedger)
            .verify(&proof)
            .unwrap_err();
        assert!(matches!(err, ClaimError::ProofInvalid(_)));
        assert_eq!(err.retry_hint(), RetryHint::RejectedPermanently);
    }
}
