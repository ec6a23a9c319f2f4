// src/data.rs
// Physical constants and static lookup tables shared by the generators.
// Masses are in GeV; the liquid-drop coefficients are in MeV.

use crate::species::Species;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const CHARGED_PION_MASS: f64 = 0.13957039;
pub const NEUTRAL_PION_MASS: f64 = 0.1349768;
pub const CHARGED_KAON_MASS: f64 = 0.493677;
pub const PROTON_MASS: f64 = 0.93827208816;
pub const NEUTRON_MASS: f64 = 0.93956542052;

/// Degrees to radians, at the precision the elastic angle tables were fitted with.
pub const DEG_TO_RAD: f64 = 0.0174533;

/// Kinetic energies are tabulated in MeV; four-momenta are carried in GeV.
pub const MEV_PER_GEV: f64 = 1000.0;

// Semi-empirical mass formula coefficients (MeV).
const VOLUME: f64 = 15.75;
const SURFACE: f64 = 17.8;
const COULOMB: f64 = 0.711;
const ASYMMETRY: f64 = 23.7;
const PAIRING: f64 = 11.18;

/// Lookup from PDG Monte Carlo code to the hadron species handled by the engine.
pub static SPECIES_BY_PDG: Lazy<HashMap<i32, Species>> = Lazy::new(|| {
    Species::ALL
        .iter()
        .map(|&species| (species.pdg(), species))
        .collect()
});

/// Liquid-drop binding energy in MeV, floored at zero for the lightest systems.
pub fn binding_energy(a: i32, z: i32) -> f64 {
    if a < 2 {
        return 0.0;
    }
    let af = a as f64;
    let zf = z as f64;
    let n = a - z;
    let mut b = VOLUME * af - SURFACE * af.powf(2.0 / 3.0)
        - COULOMB * zf * (zf - 1.0) / af.cbrt()
        - ASYMMETRY * (af - 2.0 * zf).powi(2) / af;
    let delta = PAIRING / af.sqrt();
    match (z % 2, n % 2) {
        (0, 0) => b += delta,
        (1, 1) => b -= delta,
        _ => {}
    }
    b.max(0.0)
}

/// Ground-state mass (GeV) of a nucleus with `a` nucleons and `z` protons.
///
/// A single nucleon returns the free nucleon mass; an empty nucleus has zero mass.
pub fn nucleus_mass(a: i32, z: i32) -> f64 {
    if a <= 0 {
        return 0.0;
    }
    let n = (a - z) as f64;
    z as f64 * PROTON_MASS + n * NEUTRON_MASS - binding_energy(a, z) / MEV_PER_GEV
}
