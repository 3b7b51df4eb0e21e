use ff::PrimeField as _;
use pasta_curves::{pallas, vesta};
use zdrop_circuit::Instance;
use zdrop_core::base::{MapRoot, Nullifier};

use crate::error::ClaimProofError;

pub(crate) fn base_from_repr(bytes: [u8; 32]) -> Result<pallas::Base, ClaimProofError> {
    Option::<pallas::Base>::from(pallas::Base::from_repr(bytes))
        .ok_or(ClaimProofError::NonCanonicalBase)
}

pub(crate) fn to_instance(
    root: &MapRoot,
    nullifier: &Nullifier,
) -> Result<[Vec<vesta::Scalar>; 1], ClaimProofError> {
    let root = base_from_repr(root.to_bytes())?;
    let nullifier = base_from_repr(nullifier.to_bytes())?;
    Ok(Instance::from_parts(root, nullifier).to_halo2_instance())
}
