//! Single-pion production on a bound nucleon: `h + N -> three bodies`.

use crate::angular::AngleSampler;
use crate::context::GeneratorContext;
use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::inelastic::sample_struck_nucleon;
use crate::nuclear_model::NuclearModel;
use crate::particle::{FinalState, FinalStateParticle, Hadron, ParticleStatus};
use crate::phase_space;
use crate::remnant::RemnantNucleus;
use crate::species::{Family, Species};
use rand::Rng;
use tracing::debug;

use Species::*;

/// Isospin-allowed three-body final states for `projectile` striking `struck`.
///
/// Nucleons produce `N N pi`, pions `pi pi N`, and kaons keep their identity
/// and produce `K N pi`. Every option carries the charge of the initial pair.
pub fn final_states(projectile: Species, struck: Species) -> &'static [[Species; 3]] {
    let charge = projectile.charge() + struck.charge();
    match (projectile.family(), charge) {
        (Family::Nucleon, 2) => &[[Proton, Proton, PiZero], [Proton, Neutron, PiPlus]],
        (Family::Nucleon, 1) => &[
            [Proton, Neutron, PiZero],
            [Proton, Proton, PiMinus],
            [Neutron, Neutron, PiPlus],
        ],
        (Family::Nucleon, 0) => &[[Neutron, Neutron, PiZero], [Proton, Neutron, PiMinus]],
        (Family::Pion, 2) => &[[PiPlus, PiZero, Proton], [PiPlus, PiPlus, Neutron]],
        (Family::Pion, 1) => &[
            [PiPlus, PiMinus, Proton],
            [PiZero, PiZero, Proton],
            [PiPlus, PiZero, Neutron],
        ],
        (Family::Pion, 0) => &[
            [PiPlus, PiMinus, Neutron],
            [PiZero, PiZero, Neutron],
            [PiMinus, PiZero, Proton],
        ],
        (Family::Pion, -1) => &[[PiMinus, PiZero, Neutron], [PiMinus, PiMinus, Proton]],
        (Family::Kaon, _) => match (projectile, struck) {
            (KPlus, Proton) => &[[KPlus, Proton, PiZero], [KPlus, Neutron, PiPlus]],
            (KPlus, Neutron) => &[[KPlus, Neutron, PiZero], [KPlus, Proton, PiMinus]],
            (KMinus, Proton) => &[[KMinus, Proton, PiZero], [KMinus, Neutron, PiPlus]],
            (KMinus, Neutron) => &[[KMinus, Neutron, PiZero], [KMinus, Proton, PiMinus]],
            _ => &[],
        },
        _ => &[],
    }
}

pub(crate) fn generate<A, N, R>(
    ctx: &GeneratorContext<'_, A, N>,
    hadron: &Hadron,
    remnant: &RemnantNucleus,
    rng: &mut R,
) -> Result<FinalState, GenerateError>
where
    A: AngleSampler,
    N: NuclearModel,
    R: Rng + ?Sized,
{
    if remnant.a() < 1 {
        return Err(EscapeReason::InsufficientNucleons {
            required: 1,
            available: remnant.a(),
        }
        .into());
    }

    let struck = sample_struck_nucleon(remnant.proton_fraction(), rng);
    if !remnant.has(struck) {
        return Err(EscapeReason::InsufficientNucleons {
            required: 1,
            available: remnant.count(struck),
        }
        .into());
    }

    let options = final_states(hadron.species, struck);
    if options.is_empty() {
        return Err(EscapeReason::UnsupportedChannel.into());
    }
    let pick = ((rng.gen::<f64>() * options.len() as f64) as usize).min(options.len() - 1);
    let products = options[pick];

    let target = ctx.struck_nucleon(struck, rng);
    let system = hadron.momentum + target;
    let masses = products.map(|s| s.mass());
    let required: f64 = masses.iter().sum();
    let available = system.mass();
    if !(available > required) {
        return Err(KinematicsError::BelowThreshold {
            available,
            required,
        }
        .into());
    }

    let momenta = phase_space::decay(&system, &masses, ctx.config.max_phase_space_attempts, rng)
        .map_err(|err| ctx.phase_space_failure(err))?;

    let remnant = remnant.with_changes(-1, -struck.charge(), -target)?;
    debug!(
        projectile = %hadron.species,
        %struck,
        first = %products[0],
        second = %products[1],
        third = %products[2],
        "pion production"
    );

    let rescatter = ctx.config.rescatter_produced_pions;
    let particles = products
        .iter()
        .zip(momenta)
        .map(|(&species, momentum)| {
            let particle = FinalStateParticle::stable(species, momentum, hadron.vertex);
            if rescatter && species.is_pion() {
                particle.with_status(ParticleStatus::HadronInNucleus)
            } else {
                particle
            }
        })
        .collect();

    Ok(FinalState { remnant, particles })
}
