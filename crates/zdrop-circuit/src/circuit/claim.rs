//! Claim circuit.
//!
//! Public inputs are the member map root and the nullifier. The prover witnesses a spending key
//! `sk` and the sibling path of its member key, and the circuit enforces:
//! - `key = Poseidon(Poseidon(sk, 1), 2)`,
//! - folding the leaf value `1` up the sibling path, steered by the 255 little-endian bits of
//!   `key`, yields `root`,
//! - `nf = Poseidon(sk, m)` for the claim message `m` fixed at circuit construction.
//!
//! The leaf value is a circuit constant, so a path to an empty leaf never reaches a root that
//! commits to the key.

use ff::Field;
use halo2_gadgets::poseidon::{
    Hash as PoseidonHash, Pow5Chip as PoseidonChip, Pow5Config as PoseidonConfig,
    primitives as poseidon,
};
use halo2_proofs::circuit::{AssignedCell, Layouter, Value, floor_planner};
use halo2_proofs::plonk::{
    self, Advice, Column, ConstraintSystem, Constraints, Expression, Fixed,
    Instance as InstanceColumn, Selector,
};
use halo2_proofs::poly::Rotation;
use pasta_curves::{pallas, vesta};
use zdrop_merkle_map::{MAP_DEPTH, MEMBER_VALUE, MapWitness, key_bits};

use super::gadget::{assign_constant, assign_free_advice};
use crate::identity::{MEMBER_KEY_DOMAIN, PUBLIC_KEY_DOMAIN, SpendingKey};

/// Circuit size parameter (2^14 rows).
///
/// The circuit performs `MAP_DEPTH + 3` Poseidon permutations plus one row per map level.
pub const K_CLAIM: u32 = 14;

// Public input offsets.
const ROOT: usize = 0;
const NULLIFIER: usize = 1;

type Cell = AssignedCell<pallas::Base, pallas::Base>;

/// Configuration for the claim circuit.
#[derive(Clone, Debug)]
pub struct Config {
    primary: Column<InstanceColumn>,
    advices: [Column<Advice>; 7],
    poseidon_config: PoseidonConfig<pallas::Base, 3, 2>,
    q_level: Selector,
}

impl Config {
    fn poseidon_chip(&self) -> PoseidonChip<pallas::Base, 3, 2> {
        PoseidonChip::construct(self.poseidon_config.clone())
    }

    fn hash(
        &self,
        mut layouter: impl Layouter<pallas::Base>,
        message: [Cell; 2],
    ) -> Result<Cell, plonk::Error> {
        let hasher = PoseidonHash::<
            pallas::Base,
            PoseidonChip<pallas::Base, 3, 2>,
            poseidon::P128Pow5T3,
            poseidon::ConstantLength<2>,
            3,
            2,
        >::init(self.poseidon_chip(), layouter.namespace(|| "Poseidon init"))?;
        hasher.hash(layouter.namespace(|| "Poseidon hash"), message)
    }
}

/// The claim circuit.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    /// Claim message `m`, fixed for every proof against the same keys.
    pub message: pallas::Base,
    /// Spending key `sk`.
    pub sk: Value<pallas::Base>,
    /// Member map siblings of the identity's member key, leaf level first.
    pub siblings: Value<[pallas::Base; MAP_DEPTH]>,
}

impl Circuit {
    /// Circuit with no witness, as used for key generation.
    #[must_use]
    pub fn for_message(message: pallas::Base) -> Self {
        Self {
            message,
            ..Self::default()
        }
    }

    /// Circuit witness for proving that `sk` owns the leaf opened by `witness`.
    ///
    /// The witness key is not checked here; a witness for another key simply leaves the
    /// circuit unsatisfied.
    #[must_use]
    pub fn from_parts(message: pallas::Base, sk: &SpendingKey, witness: &MapWitness) -> Self {
        Self {
            message,
            sk: Value::known(sk.inner()),
            siblings: Value::known(*witness.siblings()),
        }
    }
}

/// Public inputs to the claim circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instance {
    /// Member map root.
    pub root: pallas::Base,
    /// Nullifier.
    pub nullifier: pallas::Base,
}

impl Instance {
    /// Create the public inputs from their parts.
    #[must_use]
    pub const fn from_parts(root: pallas::Base, nullifier: pallas::Base) -> Self {
        Self { root, nullifier }
    }

    /// Public inputs in column order.
    #[must_use]
    pub fn to_halo2_instance(&self) -> [Vec<vesta::Scalar>; 1] {
        let mut instance = vec![vesta::Scalar::ZERO; 2];
        instance[ROOT] = self.root;
        instance[NULLIFIER] = self.nullifier;
        [instance]
    }
}

/// Running key sums `z_i = key >> i` for `i` in `0..=MAP_DEPTH`, with `z_MAP_DEPTH = 0`.
fn running_sums(bits: &[bool; MAP_DEPTH]) -> Vec<pallas::Base> {
    let mut sums = vec![pallas::Base::ZERO; MAP_DEPTH + 1];
    for i in (0..MAP_DEPTH).rev() {
        let bit = if bits[i] {
            pallas::Base::ONE
        } else {
            pallas::Base::ZERO
        };
        sums[i] = sums[i + 1].double() + bit;
    }
    sums
}

impl plonk::Circuit<pallas::Base> for Circuit {
    type Config = Config;
    type FloorPlanner = floor_planner::V1;

    fn without_witnesses(&self) -> Self {
        Self::for_message(self.message)
    }

    fn configure(meta: &mut ConstraintSystem<pallas::Base>) -> Self::Config {
        let advices = [
            meta.advice_column(),
            meta.advice_column(),
            meta.advice_column(),
            meta.advice_column(),
            meta.advice_column(),
            meta.advice_column(),
            meta.advice_column(),
        ];

        // Instance column used for public inputs.
        let primary = meta.instance_column();
        meta.enable_equality(primary);
        for advice in advices.iter() {
            meta.enable_equality(*advice);
        }

        // Poseidon round constants, plus one column for circuit constants.
        let fixed: [Column<Fixed>; 7] = [
            meta.fixed_column(),
            meta.fixed_column(),
            meta.fixed_column(),
            meta.fixed_column(),
            meta.fixed_column(),
            meta.fixed_column(),
            meta.fixed_column(),
        ];
        meta.enable_constant(fixed[0]);
        let rc_a = [fixed[1], fixed[2], fixed[3]];
        let rc_b = [fixed[4], fixed[5], fixed[6]];

        let poseidon_config = PoseidonChip::configure::<poseidon::P128Pow5T3>(
            meta,
            [advices[0], advices[1], advices[2]],
            advices[3],
            rc_a,
            rc_b,
        );

        // One map level:
        // - bit is boolean,
        // - (left, right) = bit ? (sib, cur) : (cur, sib),
        // - z_cur = 2 * z_next + bit, peeling the low bit off the key.
        let q_level = meta.selector();
        meta.create_gate("map level", |meta| {
            let q = meta.query_selector(q_level);
            let cur = meta.query_advice(advices[0], Rotation::cur());
            let sib = meta.query_advice(advices[1], Rotation::cur());
            let bit = meta.query_advice(advices[2], Rotation::cur());
            let left = meta.query_advice(advices[3], Rotation::cur());
            let right = meta.query_advice(advices[4], Rotation::cur());
            let z_cur = meta.query_advice(advices[5], Rotation::cur());
            let z_next = meta.query_advice(advices[6], Rotation::cur());

            let one = Expression::Constant(pallas::Base::ONE);
            let two = Expression::Constant(pallas::Base::from(2u64));

            let bit_bool = bit.clone() * (one - bit.clone());
            let left_eq = left - (cur.clone() + bit.clone() * (sib.clone() - cur.clone()));
            let right_eq = right - (sib.clone() + bit.clone() * (cur - sib));
            let decompose = z_cur - (two * z_next + bit);

            Constraints::with_selector(
                q,
                [
                    ("bit_bool", bit_bool),
                    ("left", left_eq),
                    ("right", right_eq),
                    ("decompose", decompose),
                ],
            )
        });

        Config {
            primary,
            advices,
            poseidon_config,
            q_level,
        }
    }

    fn synthesize(
        &self,
        config: Self::Config,
        mut layouter: impl Layouter<pallas::Base>,
    ) -> Result<(), plonk::Error> {
        // === Witness spending key, load constants ===
        let sk = assign_free_advice(
            layouter.namespace(|| "witness sk"),
            config.advices[0],
            self.sk,
        )?;
        let pk_domain = assign_constant(
            layouter.namespace(|| "pk domain"),
            config.advices[1],
            pallas::Base::from(PUBLIC_KEY_DOMAIN),
        )?;
        let key_domain = assign_constant(
            layouter.namespace(|| "key domain"),
            config.advices[1],
            pallas::Base::from(MEMBER_KEY_DOMAIN),
        )?;
        let message = assign_constant(
            layouter.namespace(|| "claim message"),
            config.advices[1],
            self.message,
        )?;

        // === Identity: pk, key ===
        let pk = config.hash(layouter.namespace(|| "pk = H(sk, 1)"), [sk.clone(), pk_domain])?;
        let key = config.hash(layouter.namespace(|| "key = H(pk, 2)"), [pk, key_domain])?;

        // === Nullifier (public) ===
        let nf = config.hash(layouter.namespace(|| "nf = H(sk, m)"), [sk, message])?;
        layouter.constrain_instance(nf.cell(), config.primary, NULLIFIER)?;

        // === Member map path: root ===
        let bits = key.value().map(|key| key_bits(key));
        let sums = bits.map(|bits| running_sums(&bits));

        let mut node = assign_constant(
            layouter.namespace(|| "member leaf"),
            config.advices[0],
            MEMBER_VALUE,
        )?;
        let mut z = key;

        for level in 0..MAP_DEPTH {
            let bit = bits.map(|bits| bits[level]);
            let sibling = self.siblings.map(|siblings| siblings[level]);
            let z_next_value = sums.as_ref().map(|sums| sums[level + 1]);

            let (left, right, z_next) = layouter.assign_region(
                || format!("map level {level}"),
                |mut region| {
                    config.q_level.enable(&mut region, 0)?;

                    let cur = node.copy_advice(|| "cur", &mut region, config.advices[0], 0)?;
                    let sib =
                        region.assign_advice(|| "sibling", config.advices[1], 0, || sibling)?;
                    region.assign_advice(
                        || "bit",
                        config.advices[2],
                        0,
                        || {
                            bit.map(|bit| {
                                if bit {
                                    pallas::Base::ONE
                                } else {
                                    pallas::Base::ZERO
                                }
                            })
                        },
                    )?;

                    let (left, right) = bit
                        .zip(cur.value().copied())
                        .zip(sib.value().copied())
                        .map(|((bit, cur), sib)| if bit { (sib, cur) } else { (cur, sib) })
                        .unzip();
                    let left = region.assign_advice(|| "left", config.advices[3], 0, || left)?;
                    let right = region.assign_advice(|| "right", config.advices[4], 0, || right)?;

                    z.copy_advice(|| "z_cur", &mut region, config.advices[5], 0)?;
                    let z_next = region.assign_advice(
                        || "z_next",
                        config.advices[6],
                        0,
                        || z_next_value,
                    )?;
                    Ok((left, right, z_next))
                },
            )?;

            node = config.hash(
                layouter.namespace(|| format!("level {level} node")),
                [left, right],
            )?;
            z = z_next;
        }

        // The key has exactly MAP_DEPTH bits.
        layouter.assign_region(
            || "key decomposition complete",
            |mut region| region.constrain_constant(z.cell(), pallas::Base::ZERO),
        )?;

        layouter.constrain_instance(node.cell(), config.primary, ROOT)?;

        Ok(())
    }
}
