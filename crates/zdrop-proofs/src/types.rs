use zdrop_circuit::SpendingKey;
use zdrop_merkle_map::MapWitness;

/// Inputs required to generate a claim proof.
#[derive(Clone, Debug)]
pub struct ClaimProofInputs {
    /// Claim message string the nullifier is bound to.
    pub message: String,
    /// Spending key of the claiming identity.
    pub spending_key: SpendingKey,
    /// Member map witness for the identity's member key.
    pub witness: MapWitness,
}
