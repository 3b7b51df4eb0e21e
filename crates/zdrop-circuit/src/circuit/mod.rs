//! Halo2 claim circuit.

mod claim;
mod gadget;

pub use claim::{Circuit, Instance, K_CLAIM};
