use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use ff::PrimeField as _;
use halo2_proofs::plonk;
use halo2_proofs::plonk::VerifyingKey;
use halo2_proofs::poly::commitment::Params;
use pasta_curves::{pallas, vesta};
use zdrop_circuit::{Circuit, K_CLAIM};

use crate::error::ClaimProofError;

#[derive(Debug)]
pub(crate) struct Keys {
    pub(crate) vk: VerifyingKey<vesta::Affine>,
    pub(crate) pk: plonk::ProvingKey<vesta::Affine>,
}

fn keygen(params: &Params<vesta::Affine>, message: pallas::Base) -> Result<Keys, ClaimProofError> {
    // Keygen doesn't need witnesses, but the message is a circuit constant.
    let circuit = Circuit::for_message(message);

    let vk = plonk::keygen_vk(params, &circuit).map_err(ClaimProofError::Keygen)?;
    let pk = plonk::keygen_pk(params, vk.clone(), &circuit).map_err(ClaimProofError::Keygen)?;

    Ok(Keys { vk, pk })
}

/// Keys for the claim circuit of `message`, generated once per process and message.
pub(crate) fn keys_for(
    params: &Params<vesta::Affine>,
    message: pallas::Base,
) -> Result<Arc<Keys>, ClaimProofError> {
    let actual = params.k();
    if actual != K_CLAIM {
        return Err(ClaimProofError::InvalidParamsK {
            expected: K_CLAIM,
            actual,
        });
    }

    static CACHE: OnceLock<Mutex<HashMap<[u8; 32], Arc<Keys>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let cache_key = message.to_repr();

    if let Some(keys) = cache
        .lock()
        .map_err(|_| ClaimProofError::CachePoisoned)?
        .get(&cache_key)
        .cloned()
    {
        return Ok(keys);
    }

    let keys = Arc::new(keygen(params, message)?);
    cache
        .lock()
        .map_err(|_| ClaimProofError::CachePoisoned)?
        .insert(cache_key, Arc::clone(&keys));
    Ok(keys)
}
