#![allow(dead_code)]

use nalgebra::Vector3;
use nucascade::{FateTable, Hadron, Species};

#[path = "../../src/test_support.rs"]
mod test_support;

pub use test_support::ScriptedRng;

pub const FATE_TABLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fate_fractions.json");

pub fn load_table() -> FateTable {
    FateTable::from_json_file(FATE_TABLE).unwrap()
}

pub fn incident(species: Species, kinetic: f64) -> Hadron {
    Hadron::with_kinetic_energy(species, kinetic, &Vector3::new(0.0, 0.0, 1.0), [0.0; 4])
}
