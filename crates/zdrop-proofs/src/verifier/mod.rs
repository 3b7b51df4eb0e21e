use halo2_proofs::plonk::{SingleVerifier, verify_proof};
use halo2_proofs::poly::commitment::Params;
use halo2_proofs::transcript::Blake2bRead;
use pasta_curves::vesta;
use zdrop_circuit::claim_message;
use zdrop_core::schema::proof::ClaimProof;

use crate::error::ClaimProofError;
use crate::instance::to_instance;
use crate::keys::keys_for;

/// Verify a claim proof against its own public root and nullifier.
///
/// Whether that root is the published commitment is for the caller to check.
///
/// # Errors
/// Returns an error if the public inputs fail decoding or if Halo2 verification fails.
pub fn verify_claim_proof(
    params: &Params<vesta::Affine>,
    proof: &ClaimProof,
    message: &str,
) -> Result<(), ClaimProofError> {
    let [col0] = to_instance(&proof.root, &proof.nullifier)?;
    let instance_cols: [&[vesta::Scalar]; 1] = [&col0[..]];
    let instances: [&[&[vesta::Scalar]]; 1] = [&instance_cols];

    let keys = keys_for(params, claim_message(message))?;
    let strategy = SingleVerifier::new(params);
    let mut transcript = Blake2bRead::init(&proof.zkproof[..]);
    verify_proof(params, &keys.vk, strategy, &instances, &mut transcript)?;
    Ok(())
}
