//! Small assignment helpers shared by the claim circuit regions.

use halo2_proofs::circuit::{AssignedCell, Layouter, Value};
use halo2_proofs::plonk::{Advice, Column, Error};
use pasta_curves::pallas;

/// Witness a private value in its own single-row region.
pub fn assign_free_advice(
    mut layouter: impl Layouter<pallas::Base>,
    column: Column<Advice>,
    value: Value<pallas::Base>,
) -> Result<AssignedCell<pallas::Base, pallas::Base>, Error> {
    layouter.assign_region(
        || "load private",
        |mut region| region.assign_advice(|| "private input", column, 0, || value),
    )
}

/// Assign a value fixed by the circuit itself, so the prover cannot substitute another one.
pub fn assign_constant(
    mut layouter: impl Layouter<pallas::Base>,
    column: Column<Advice>,
    constant: pallas::Base,
) -> Result<AssignedCell<pallas::Base, pallas::Base>, Error> {
    layouter.assign_region(
        || "load constant",
        |mut region| region.assign_advice_from_constant(|| "constant", column, 0, constant),
    )
}
