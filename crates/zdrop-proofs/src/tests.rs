use halo2_proofs::poly::commitment::Params;
use pasta_curves::vesta;
use zdrop_core::base::{MapRoot, Nullifier};
use zdrop_core::schema::proof::ClaimProof;

use crate::instance::to_instance;

fn dummy_proof() -> ClaimProof {
    ClaimProof::new(Vec::new(), MapRoot::default(), Nullifier::default())
}

fn dummy_params() -> Params<vesta::Affine> {
    // These tests return before Halo2 keygen, so this can be small.
    Params::new(1)
}

#[test]
fn to_instance_orders_root_then_nullifier() {
    let mut root = [0_u8; 32];
    root[0] = 5;
    let mut nullifier = [0_u8; 32];
    nullifier[0] = 9;

    let [inst] = match to_instance(&MapRoot::new(root), &Nullifier::new(nullifier)) {
        Ok(v) => v,
        Err(e) => panic!("instance: {e}"),
    };
    assert_eq!(inst, vec![vesta::Scalar::from(5), vesta::Scalar::from(9)]);
}

#[test]
fn to_instance_rejects_non_canonical_root() {
    let err = to_instance(&MapRoot::new([0xff; 32]), &Nullifier::default()).unwrap_err();
    assert!(matches!(err, crate::ClaimProofError::NonCanonicalBase));
    assert!(err.is_invalid_proof());
}

#[cfg(feature = "verify")]
#[test]
fn verify_rejects_params_of_wrong_size() {
    let err = crate::verifier::verify_claim_proof(&dummy_params(), &dummy_proof(), "round-1")
        .unwrap_err();
    assert!(matches!(
        err,
        crate::ClaimProofError::InvalidParamsK {
            expected: crate::K_CLAIM,
            actual: 1
        }
    ));
    assert!(!err.is_invalid_proof());
}

#[cfg(feature = "prove")]
mod prove {
    use rand_core::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use zdrop_circuit::SpendingKey;
    use zdrop_merkle_map::MerkleMap;

    use super::*;
    use crate::types::ClaimProofInputs;

    fn members(rng: &mut XorShiftRng) -> (SpendingKey, MerkleMap) {
        let claimant = SpendingKey::random(&mut *rng);
        let mut map = MerkleMap::new();
        map.insert_member(claimant.member_key());
        for _ in 0..4 {
            map.insert_member(SpendingKey::random(&mut *rng).member_key());
        }
        (claimant, map)
    }

    #[test]
    fn prove_rejects_witness_for_another_key() {
        let mut rng = XorShiftRng::from_seed([1; 16]);
        let (claimant, map) = members(&mut rng);
        let outsider = SpendingKey::random(&mut rng);

        let inputs = ClaimProofInputs {
            message: "round-1".to_owned(),
            spending_key: outsider,
            witness: map.witness(claimant.member_key()),
        };
        let err = crate::prover::generate_claim_proof(&dummy_params(), &inputs).unwrap_err();
        assert!(matches!(err, crate::ClaimProofError::KeyMismatch));
    }

    #[cfg(feature = "verify")]
    #[test]
    #[ignore = "Heavy computation: generates claim circuit keys and a real proof"]
    fn proof_round_trip_and_tampering() {
        let mut rng = XorShiftRng::from_seed([2; 16]);
        let (claimant, map) = members(&mut rng);
        let params = Params::<vesta::Affine>::new(crate::K_CLAIM);

        let inputs = ClaimProofInputs {
            message: "round-1".to_owned(),
            spending_key: claimant,
            witness: map.witness(claimant.member_key()),
        };
        let proof = crate::prover::generate_claim_proof(&params, &inputs).expect("prove");
        assert_eq!(proof.root, map.root_bytes());
        assert_eq!(
            proof.nullifier,
            claimant.nullifier_bytes(zdrop_circuit::claim_message("round-1"))
        );

        crate::verifier::verify_claim_proof(&params, &proof, "round-1").expect("verify");

        // Proof is bound to its claim message.
        assert!(crate::verifier::verify_claim_proof(&params, &proof, "round-2").is_err());

        // Tampered public outputs fail.
        let mut tampered = proof.clone();
        tampered.nullifier = claimant.nullifier_bytes(zdrop_circuit::claim_message("round-2"));
        assert!(crate::verifier::verify_claim_proof(&params, &tampered, "round-1").is_err());

        let mut tampered = proof;
        tampered.root = MerkleMap::new().root_bytes();
        assert!(crate::verifier::verify_claim_proof(&params, &tampered, "round-1").is_err());
    }
}
