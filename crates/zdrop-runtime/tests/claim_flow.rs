//! End-to-end claim flow with real Halo2 proofs.

use std::sync::Arc;

use halo2_proofs::poly::commitment::Params;
use pasta_curves::vesta;
use rand_core::SeedableRng;
use rand_xorshift::XorShiftRng;
use zdrop_circuit::SpendingKey;
use zdrop_core::base::AccountId;
use zdrop_merkle_map::MerkleMap;
use zdrop_proofs::{ClaimProofInputs, K_CLAIM, generate_claim_proof};
use zdrop_runtime::{
    BalanceLedger, ClaimError, ClaimProcessor, Halo2ClaimVerifier, MemoryStore, Sequencer,
};

const MESSAGE: &str = "zdrop-e2e";

#[test]
#[ignore = "Heavy computation: generates claim circuit keys and real proofs"]
fn members_claim_once_and_outsiders_are_rejected() {
    let mut rng = XorShiftRng::from_seed([21; 16]);
    let members: Vec<SpendingKey> = (0..3).map(|_| SpendingKey::random(&mut rng)).collect();
    let outsider = SpendingKey::random(&mut rng);

    let mut map = MerkleMap::new();
    for member in &members {
        map.insert_member(member.member_key());
    }

    let params = Arc::new(Params::<vesta::Affine>::new(K_CLAIM));
    let verifier = Halo2ClaimVerifier::new(Arc::clone(&params), MESSAGE);
    let sequencer = Sequencer::new(
        MemoryStore::new(),
        ClaimProcessor::new(verifier, BalanceLedger),
    );

    let authority = AccountId::new([1; 32]);
    let alice = AccountId::new([2; 32]);
    sequencer
        .publish_commitment(&authority, map.root_bytes())
        .expect("publish");

    let prove = |sk: SpendingKey, witness_map: &MerkleMap| {
        generate_claim_proof(
            &params,
            &ClaimProofInputs {
                message: MESSAGE.to_owned(),
                spending_key: sk,
                witness: witness_map.witness(sk.member_key()),
            },
        )
        .expect("prove")
    };

    let proof = prove(members[0], &map);
    let receipt = sequencer.submit_claim(&alice, &proof).expect("claim");
    assert_eq!(receipt.balance, 1000);

    let err = sequencer.submit_claim(&alice, &proof).unwrap_err();
    assert!(matches!(err, ClaimError::NullifierReused(_)));
    assert_eq!(sequencer.balance(&alice).expect("balance"), 1000);

    // An outsider can only prove against a map that contains them.
    let mut forged = map.clone();
    forged.insert_member(outsider.member_key());
    let forged_proof = prove(outsider, &forged);
    let err = sequencer.submit_claim(&alice, &forged_proof).unwrap_err();
    assert!(matches!(err, ClaimError::RootMismatch { .. }));

    // Tampering with the public nullifier breaks the proof.
    let mut tampered = prove(members[1], &map);
    tampered.nullifier = members[2].nullifier_bytes(zdrop_circuit::claim_message(MESSAGE));
    let err = sequencer.submit_claim(&alice, &tampered).unwrap_err();
    assert!(matches!(err, ClaimError::ProofInvalid(_)));
    assert_eq!(sequencer.balance(&alice).expect("balance"), 1000);
}
