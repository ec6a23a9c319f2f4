//! Hadron transport inside a nucleus in the "hA" style: each hadron gets a
//! fate drawn from tabulated fractions, then a final state generated for
//! that fate, while a remnant nucleus keeps track of what is left.

pub mod absorption;
pub mod angular;
pub mod bank;
pub mod cascade;
pub mod config;
mod context;
pub mod data;
pub mod elastic;
pub mod error;
pub mod fast_rng;
pub mod fate;
pub mod fate_table;
pub mod inelastic;
pub mod kinematics;
pub mod multiplicity;
pub mod nuclear_model;
pub mod particle;
pub mod phase_space;
pub mod pion_production;
pub mod record;
pub mod remnant;
pub mod species;
mod utilities;

#[cfg(test)]
mod test_support;

pub use angular::{AngleSampler, IsotropicAngles, ScatterChannel};
pub use cascade::{simulate_events, EventSummary, HadronTransport, Interaction, Outcome};
pub use config::TransportConfig;
pub use error::{DataError, EscapeReason, GenerateError, KinematicsError, RemnantError};
pub use fast_rng::EventRng;
pub use fate::{select_fate, Fate};
pub use fate_table::{FateFractions, FateTable, FractionCurve};
pub use kinematics::FourMomentum;
pub use nuclear_model::{FermiGas, NuclearModel};
pub use particle::{FinalState, FinalStateParticle, Hadron, Parent, ParticleStatus};
pub use record::{EventRecord, RecordEntry};
pub use remnant::{Nucleus, RemnantNucleus};
pub use species::{Family, Species};
pub use utilities::interpolate_linear;
