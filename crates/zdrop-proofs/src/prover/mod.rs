use ff::PrimeField as _;
use halo2_proofs::plonk;
use halo2_proofs::poly::commitment::Params;
use halo2_proofs::transcript::Blake2bWrite;
use pasta_curves::vesta;
use zdrop_circuit::{Circuit, Instance, claim_message};
use zdrop_core::base::{MapRoot, Nullifier};
use zdrop_core::schema::proof::ClaimProof;
use zdrop_merkle_map::MEMBER_VALUE;

use crate::error::ClaimProofError;
use crate::keys::keys_for;
use crate::types::ClaimProofInputs;

/// Generate a claim proof.
///
/// The public root is the one the witness reconstructs for a member leaf. It only matches a
/// published commitment if the identity really is a member of that map.
///
/// # Errors
/// Returns an error if the witness opens a key other than the identity's member key, if the
/// params do not fit the claim circuit, or if Halo2 keygen/proving fails.
pub fn generate_claim_proof(
    params: &Params<vesta::Affine>,
    inputs: &ClaimProofInputs,
) -> Result<ClaimProof, ClaimProofError> {
    let member_key = inputs.spending_key.member_key();
    let (root, key) = inputs.witness.compute_root_and_key(MEMBER_VALUE);
    if key != member_key {
        return Err(ClaimProofError::KeyMismatch);
    }

    let message = claim_message(&inputs.message);
    let nullifier = inputs.spending_key.nullifier(message);

    let circuit = Circuit::from_parts(message, &inputs.spending_key, &inputs.witness);
    let [col0] = Instance::from_parts(root, nullifier).to_halo2_instance();
    let instance_cols: [&[vesta::Scalar]; 1] = [&col0[..]];
    let instances: [&[&[vesta::Scalar]]; 1] = [&instance_cols];

    // Prove.
    let keys = keys_for(params, message)?;
    let mut transcript = Blake2bWrite::<_, vesta::Affine, _>::init(vec![]);
    plonk::create_proof(
        params,
        &keys.pk,
        &[circuit],
        &instances,
        &mut rand::rngs::OsRng,
        &mut transcript,
    )?;
    let proof = transcript.finalize();

    Ok(ClaimProof::new(
        proof,
        MapRoot::new(root.to_repr()),
        Nullifier::new(nullifier.to_repr()),
    ))
}
