//! Quasi-elastic knockout and charge exchange on a single bound nucleon.

use crate::angular::{AngleSampler, ScatterChannel};
use crate::context::GeneratorContext;
use crate::data::MEV_PER_GEV;
use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::fate::Fate;
use crate::kinematics::two_body;
use crate::nuclear_model::NuclearModel;
use crate::particle::{FinalState, FinalStateParticle, Hadron};
use crate::remnant::RemnantNucleus;
use crate::species::Species;
use rand::Rng;
use tracing::debug;

use Species::*;

/// Hadron-nucleon channel: `projectile + struck -> scattered + recoil`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NucleonChannel {
    pub projectile: Species,
    pub struck: Species,
    pub scattered: Species,
    pub recoil: Species,
}

const fn channel(
    projectile: Species,
    struck: Species,
    scattered: Species,
    recoil: Species,
) -> NucleonChannel {
    NucleonChannel {
        projectile,
        struck,
        scattered,
        recoil,
    }
}

/// Isospin-allowed charge-exchange reactions.
pub const CHARGE_EXCHANGE: [NucleonChannel; 6] = [
    channel(PiPlus, Neutron, PiZero, Proton),
    channel(PiMinus, Proton, PiZero, Neutron),
    channel(PiZero, Proton, PiPlus, Neutron),
    channel(PiZero, Neutron, PiMinus, Proton),
    channel(Proton, Neutron, Neutron, Proton),
    channel(Neutron, Proton, Proton, Neutron),
];

/// Draw the nucleon species struck at random in a nucleus with proton fraction `f`.
pub fn sample_struck_nucleon<R: Rng + ?Sized>(proton_fraction: f64, rng: &mut R) -> Species {
    if rng.gen::<f64>() <= proton_fraction {
        Proton
    } else {
        Neutron
    }
}

/// Choose the final-state channel for a charge-exchange or inelastic fate.
///
/// Charge exchange follows [`CHARGE_EXCHANGE`]; when a projectile has a
/// channel on each nucleon the struck nucleon is chosen by the remnant's
/// proton fraction. Inelastic scattering keeps the projectile and struck
/// species.
pub fn select_channel<R: Rng + ?Sized>(
    projectile: Species,
    fate: Fate,
    proton_fraction: f64,
    rng: &mut R,
) -> Option<NucleonChannel> {
    match fate {
        Fate::ChargeExchange => {
            let candidates: Vec<&NucleonChannel> = CHARGE_EXCHANGE
                .iter()
                .filter(|c| c.projectile == projectile)
                .collect();
            match candidates.as_slice() {
                [] => None,
                [only] => Some(**only),
                _ => {
                    let struck = sample_struck_nucleon(proton_fraction, rng);
                    candidates.into_iter().find(|c| c.struck == struck).copied()
                }
            }
        }
        Fate::Inelastic => {
            let struck = sample_struck_nucleon(proton_fraction, rng);
            Some(channel(projectile, struck, projectile, struck))
        }
        _ => None,
    }
}

pub(crate) fn generate<A, N, R>(
    ctx: &GeneratorContext<'_, A, N>,
    hadron: &Hadron,
    fate: Fate,
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

    let ch = select_channel(hadron.species, fate, remnant.proton_fraction(), rng)
        .ok_or(EscapeReason::UnsupportedChannel)?;

    if !remnant.has(ch.struck) {
        return Err(EscapeReason::InsufficientNucleons {
            required: 1,
            available: remnant.count(ch.struck),
        }
        .into());
    }
    let struck_charge = ch.struck.charge();
    if remnant.z() < struck_charge {
        return Err(EscapeReason::ChargeInfeasible.into());
    }

    let target = ctx.struck_nucleon(ch.struck, rng);
    let projectile = &hadron.momentum;
    let mp = hadron.species.mass();
    let mt = ch.struck.mass();

    // lab kinetic energy of an equivalent collision on a nucleon at rest
    let s = (*projectile + target).mass2();
    let equivalent_kinetic = (s - mt * mt - mp * mp) / (2.0 * mt) - mp;

    let angle_channel = ScatterChannel {
        projectile: ch.projectile,
        struck: ch.struck,
        scattered: ch.scattered,
        fate,
    };
    let cos_theta =
        ctx.angles
            .sample_cos_theta(&angle_channel, equivalent_kinetic * MEV_PER_GEV, rng);
    if !(-1.0..=1.0).contains(&cos_theta) {
        return Err(KinematicsError::UnphysicalAngle(cos_theta).into());
    }

    let fs = two_body(
        ch.scattered.mass(),
        ch.recoil.mass(),
        projectile,
        &target,
        cos_theta,
        0.0,
        rng,
    )?;

    let q_value = (mp + mt - ch.scattered.mass() - ch.recoil.mass()).max(0.0);
    let available = (projectile.e - mp) + (target.e - mt) + q_value;
    ctx.check_energy_ceiling(
        &[(ch.scattered, &fs.first), (ch.recoil, &fs.second)],
        available,
    )?;

    let remnant = remnant.with_changes(-1, -struck_charge, fs.recoil - target)?;
    debug!(
        projectile = %ch.projectile,
        struck = %ch.struck,
        scattered = %ch.scattered,
        %fate,
        "nucleon knockout"
    );

    Ok(FinalState {
        remnant,
        particles: vec![
            FinalStateParticle::stable(ch.scattered, fs.first, hadron.vertex),
            FinalStateParticle::stable(ch.recoil, fs.second, hadron.vertex),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::Setup;
    use crate::kinematics::FourMomentum;
    use crate::test_support::ScriptedRng;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hadron(species: Species, kinetic: f64) -> Hadron {
        Hadron::with_kinetic_energy(species, kinetic, &Vector3::new(0.1, 0.0, 1.0), [0.0; 4])
    }

    #[test]
    fn test_charge_exchange_channels_conserve_charge() {
        for c in CHARGE_EXCHANGE {
            assert_eq!(
                c.projectile.charge() + c.struck.charge(),
                c.scattered.charge() + c.recoil.charge()
            );
            assert_eq!(
                c.projectile.baryon_number() + c.struck.baryon_number(),
                c.scattered.baryon_number() + c.recoil.baryon_number()
            );
        }
    }

    #[test]
    fn test_neutral_pion_struck_nucleon_follows_proton_fraction() {
        let mut rng = ScriptedRng::new(&[0.2, 0.8]);
        let on_proton = select_channel(PiZero, Fate::ChargeExchange, 0.5, &mut rng).unwrap();
        assert_eq!((on_proton.struck, on_proton.scattered), (Proton, PiPlus));
        let on_neutron = select_channel(PiZero, Fate::ChargeExchange, 0.5, &mut rng).unwrap();
        assert_eq!((on_neutron.struck, on_neutron.scattered), (Neutron, PiMinus));
    }

    #[test]
    fn test_channel_selection_edge_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_channel(KPlus, Fate::ChargeExchange, 0.5, &mut rng), None);
        assert_eq!(select_channel(PiPlus, Fate::Elastic, 0.5, &mut rng), None);
        let inel = select_channel(KMinus, Fate::Inelastic, 1.0, &mut rng).unwrap();
        assert_eq!(inel, channel(KMinus, Proton, KMinus, Proton));
    }

    #[test]
    fn test_knockout_conserves_everything() {
        let setup = Setup::new(16, 8);
        let ctx = setup.ctx();
        let remnant = RemnantNucleus::from_target(&setup.target);
        let mut rng = StdRng::seed_from_u64(17);
        for (species, fate) in [
            (PiPlus, Fate::ChargeExchange),
            (PiMinus, Fate::Inelastic),
            (Neutron, Fate::ChargeExchange),
            (KPlus, Fate::Inelastic),
        ] {
            let h = hadron(species, 0.3);
            let fs = generate(&ctx, &h, fate, &remnant, &mut rng).unwrap();
            let p_out = fs.particles.iter().map(|p| p.momentum).sum::<FourMomentum>()
                + *fs.remnant.momentum();
            assert!(p_out.approx_eq(&(h.momentum + *remnant.momentum()), 1e-6));

            let q_out =
                fs.particles.iter().map(|p| p.species.charge()).sum::<i32>() + fs.remnant.z();
            assert_eq!(q_out, species.charge() + remnant.z());
            let b_out = fs.particles.iter().map(|p| p.species.baryon_number()).sum::<i32>()
                + fs.remnant.a();
            assert_eq!(b_out, species.baryon_number() + remnant.a());
        }
    }

    #[test]
    fn test_missing_struck_nucleon_is_terminal() {
        let setup = Setup::new(12, 6);
        // pi- charge exchange needs a proton
        let neutrons_only = RemnantNucleus::new(2, 0, FourMomentum::at_rest(1.88)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let pion = hadron(PiMinus, 0.2);
        let err = generate(&setup.ctx(), &pion, Fate::ChargeExchange, &neutrons_only, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Terminal(EscapeReason::InsufficientNucleons { .. })
        ));
    }

    #[test]
    fn test_energy_ceiling_is_recoverable() {
        let setup = Setup::new(12, 6);
        let mut ctx = setup.ctx();
        ctx.energy_ceiling = Some(0.0);
        let remnant = RemnantNucleus::from_target(&setup.target);
        let mut rng = StdRng::seed_from_u64(3);
        let proton = hadron(Proton, 0.5);
        let err = generate(&ctx, &proton, Fate::Inelastic, &remnant, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Recoverable(KinematicsError::EnergyBound { .. })
        ));
    }
}
