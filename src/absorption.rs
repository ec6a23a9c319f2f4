//! Absorption of a hadron by the nucleus.
//!
//! Pions and kaons are sometimes absorbed on a correlated nucleon pair and
//! emerge as two nucleons; otherwise, and always for nucleon projectiles, a
//! statistical multiplicity of protons and neutrons is emitted through
//! phase-space decay. Large emissions are split into five decay groups.

use crate::angular::{AngleSampler, ScatterChannel};
use crate::context::GeneratorContext;
use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::fate::Fate;
use crate::kinematics::{two_body, FourMomentum};
use crate::multiplicity::{DrawLimits, Multiplicity, MultiplicityModel};
use crate::nuclear_model::NuclearModel;
use crate::particle::{FinalState, FinalStateParticle, Hadron, Parent, ParticleStatus};
use crate::phase_space::{self, MAX_PRODUCTS};
use crate::remnant::RemnantNucleus;
use crate::species::{Family, Species};
use rand::Rng;
use tracing::debug;

use Species::{Neutron, Proton};

/// Number of decay groups an oversized emission is split into.
pub const DECAY_GROUPS: usize = 5;

/// `projectile + (struck pair) -> two nucleons`, selected by projectile charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairChannel {
    pub charge: i32,
    pub struck: [Species; 2],
    pub products: [Species; 2],
    /// Weight is `coefficient` times the probability of drawing the pair.
    pub coefficient: f64,
}

const fn pair(
    charge: i32,
    struck: [Species; 2],
    products: [Species; 2],
    coefficient: f64,
) -> PairChannel {
    PairChannel {
        charge,
        struck,
        products,
        coefficient,
    }
}

pub const PAIR_ABSORPTION: [PairChannel; 7] = [
    pair(1, [Neutron, Proton], [Proton, Proton], 2.0),
    pair(1, [Neutron, Neutron], [Proton, Neutron], 0.083),
    pair(-1, [Proton, Neutron], [Neutron, Neutron], 2.0),
    pair(-1, [Proton, Proton], [Proton, Neutron], 0.083),
    pair(0, [Neutron, Proton], [Neutron, Proton], 0.88),
    pair(0, [Proton, Proton], [Proton, Proton], 0.14),
    pair(0, [Neutron, Neutron], [Neutron, Neutron], 0.14),
];

impl PairChannel {
    pub fn weight(&self, proton_fraction: f64) -> f64 {
        self.struck.iter().fold(self.coefficient, |w, s| {
            w * if *s == Proton {
                proton_fraction
            } else {
                1.0 - proton_fraction
            }
        })
    }

    fn needs(&self, nucleon: Species) -> i32 {
        self.struck.iter().filter(|&&s| s == nucleon).count() as i32
    }
}

/// Probability that a pion or kaon is absorbed on a nucleon pair.
pub fn two_body_probability(a: i32, kinetic_energy: f64) -> f64 {
    1.14 * (0.903 - 0.00189 * a as f64) * (1.35 - 0.00467 * kinetic_energy)
}

/// Weighted choice among the pair channels for a projectile of `charge`.
pub fn select_pair<R: Rng + ?Sized>(
    charge: i32,
    proton_fraction: f64,
    rng: &mut R,
) -> Option<&'static PairChannel> {
    let candidates: Vec<(&PairChannel, f64)> = PAIR_ABSORPTION
        .iter()
        .filter(|c| c.charge == charge)
        .map(|c| (c, c.weight(proton_fraction)))
        .collect();
    let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if !(total > 0.0) {
        return None;
    }
    let r = total * rng.gen::<f64>();
    let mut cumulative = 0.0;
    for &(channel, w) in &candidates {
        cumulative += w;
        if r < cumulative {
            return Some(channel);
        }
    }
    candidates.last().map(|&(c, _)| c)
}

/// One phase-space decay: a seed four-momentum topped up with bound nucleons.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayGroup {
    pub seed: FourMomentum,
    pub seed_species: Species,
    /// Decay products, in emission order.
    pub members: Vec<Species>,
    /// The first member is carried by the seed rather than taken from the remnant.
    pub seed_is_member: bool,
}

impl DecayGroup {
    /// Energy drawn from the remnant for members not carried by the seed.
    fn borrowed_energy(&self, removal_energy: f64) -> f64 {
        let skip = usize::from(self.seed_is_member);
        self.members
            .iter()
            .skip(skip)
            .map(|s| s.mass() - removal_energy)
            .sum()
    }

    /// Four-momentum handed to the phase-space decay.
    pub fn system(&self, removal_energy: f64) -> FourMomentum {
        self.seed + FourMomentum::energy(self.borrowed_energy(removal_energy))
    }
}

/// Move one nucleon of `preferred` species (or the other if none are left) out of `m`.
fn take_nucleon(m: &mut Multiplicity, preferred: Species) -> Species {
    let take_proton = match preferred {
        Proton => m.protons > 0,
        _ => m.neutrons == 0,
    };
    if take_proton {
        m.protons -= 1;
        Proton
    } else {
        m.neutrons -= 1;
        Neutron
    }
}

/// Package an emission into decay groups.
///
/// Up to [`MAX_PRODUCTS`] nucleons decay as one group seeded by the
/// projectile. Larger emissions are split into [`DECAY_GROUPS`] groups:
/// the projectile carries a fifth of its kinetic energy and momentum into
/// group 0, and four nucleons are borrowed from the emission to seed the
/// other groups with a fifth each. The second return value is the summed
/// rest energy of the borrowed seeds, which the remnant must give up.
///
/// A nucleon projectile always stands in for one emitted nucleon of its group.
pub fn build_groups<R: Rng + ?Sized>(
    projectile: &Hadron,
    emission: Multiplicity,
    removal_energy: f64,
    rng: &mut R,
) -> (Vec<DecayGroup>, FourMomentum) {
    let mut left = emission;
    let nucleon_projectile = projectile.species.is_nucleon();

    if emission.total() as usize <= MAX_PRODUCTS {
        let mut members = Vec::with_capacity(emission.total() as usize);
        if nucleon_projectile {
            members.push(take_nucleon(&mut left, projectile.species));
        }
        members.extend(std::iter::repeat(Proton).take(left.protons as usize));
        members.extend(std::iter::repeat(Neutron).take(left.neutrons as usize));
        let group = DecayGroup {
            seed: projectile.momentum,
            seed_species: projectile.species,
            members,
            seed_is_member: nucleon_projectile,
        };
        return (vec![group], FourMomentum::default());
    }

    let mass = projectile.species.mass();
    let kinetic_share = (projectile.momentum.e - mass) / DECAY_GROUPS as f64;
    let momentum_share = projectile.momentum.p / DECAY_GROUPS as f64;

    let mut groups = Vec::with_capacity(DECAY_GROUPS);
    groups.push(DecayGroup {
        seed: FourMomentum::new(mass + kinetic_share, momentum_share),
        seed_species: projectile.species,
        members: Vec::new(),
        seed_is_member: false,
    });

    let mut borrowed = FourMomentum::default();
    for _ in 1..DECAY_GROUPS {
        let pick_proton = left.total() as f64 * rng.gen::<f64>() < left.protons as f64;
        let species = take_nucleon(&mut left, if pick_proton { Proton } else { Neutron });
        let rest = FourMomentum::energy(species.mass() - removal_energy);
        borrowed += rest;
        groups.push(DecayGroup {
            seed: rest + FourMomentum::new(kinetic_share, momentum_share),
            seed_species: species,
            members: vec![species],
            seed_is_member: true,
        });
    }

    if nucleon_projectile {
        groups[0].members.push(take_nucleon(&mut left, projectile.species));
        groups[0].seed_is_member = true;
    }

    let protons_left = left.protons;
    for i in 0..left.total() {
        let species = if i < protons_left { Proton } else { Neutron };
        groups[i as usize % DECAY_GROUPS].members.push(species);
    }

    (groups, borrowed)
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
    let species = hadron.species;
    let family = species.family();
    if family == Family::Photon {
        return Err(EscapeReason::UnsupportedChannel.into());
    }
    if remnant.a() < 2 {
        return Err(EscapeReason::InsufficientNucleons {
            required: 2,
            available: remnant.a(),
        }
        .into());
    }
    if family != Family::Nucleon {
        let q = species.charge();
        if (q < 0 && remnant.z() < 1) || (q > 0 && remnant.neutrons() < 1) {
            return Err(EscapeReason::ChargeInfeasible.into());
        }
        if rng.gen::<f64>() < two_body_probability(remnant.a(), hadron.kinetic_energy_mev()) {
            return pair_absorption(ctx, hadron, remnant, rng);
        }
    }
    multi_nucleon_emission(ctx, hadron, remnant, rng)
}

fn pair_absorption<A, N, R>(
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
    let channel = select_pair(hadron.species.charge(), remnant.proton_fraction(), rng)
        .ok_or(EscapeReason::UnsupportedChannel)?;
    for nucleon in [Proton, Neutron] {
        let needed = channel.needs(nucleon);
        if remnant.count(nucleon) < needed {
            return Err(EscapeReason::InsufficientNucleons {
                required: needed,
                available: remnant.count(nucleon),
            }
            .into());
        }
    }

    let [s1, s2] = channel.struck;
    let [out1, out2] = channel.products;
    let pair_momentum = ctx.struck_nucleon(s1, rng) + ctx.struck_nucleon(s2, rng);

    let angle_channel = ScatterChannel {
        projectile: hadron.species,
        struck: s1,
        scattered: out1,
        fate: Fate::Absorption,
    };
    let cos_theta = ctx
        .angles
        .sample_cos_theta(&angle_channel, hadron.kinetic_energy_mev(), rng);
    if !(-1.0..=1.0).contains(&cos_theta) {
        return Err(KinematicsError::UnphysicalAngle(cos_theta).into());
    }

    let fs = two_body(
        out1.mass(),
        out2.mass(),
        &hadron.momentum,
        &pair_momentum,
        cos_theta,
        ctx.config.two_body_absorption_binding,
        rng,
    )?;

    let delta_z = hadron.species.charge() - out1.charge() - out2.charge();
    let remnant = remnant.with_changes(-2, delta_z, fs.recoil - pair_momentum)?;
    debug!(projectile = %hadron.species, %out1, %out2, "absorption on nucleon pair");

    Ok(FinalState {
        remnant,
        particles: vec![
            FinalStateParticle::stable(out1, fs.first, hadron.vertex),
            FinalStateParticle::stable(out2, fs.second, hadron.vertex),
        ],
    })
}

fn multi_nucleon_emission<A, N, R>(
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
    let species = hadron.species;
    let model = MultiplicityModel::for_projectile(
        species,
        remnant.a(),
        remnant.z(),
        hadron.kinetic_energy_mev(),
    )
    .ok_or(EscapeReason::UnsupportedChannel)?;

    // the projectile joins the remnant before anything is emitted
    let q = species.charge();
    let b = species.baryon_number();
    let available = Multiplicity {
        protons: remnant.z() + q,
        neutrons: remnant.neutrons() + b - q,
    };
    let limits = DrawLimits {
        multiplicity_draws: ctx.config.max_multiplicity_draws,
        sum_draws: ctx.config.max_sum_draws,
    };
    let emission = model.sample(available, limits, rng)?;

    let removal = ctx.config.nucleon_removal_energy;
    let (groups, borrowed) = build_groups(hadron, emission, removal, rng);
    let grouped = groups.len() > 1;

    let mut taken = borrowed;
    let mut particles = Vec::with_capacity(emission.total() as usize + groups.len());
    for group in &groups {
        let system = group.system(removal);
        taken += system - group.seed;
        let masses: Vec<f64> = group.members.iter().map(|s| s.mass()).collect();
        let attempts = ctx.config.max_phase_space_attempts;
        let products = phase_space::decay(&system, &masses, attempts, rng)
            .map_err(|err| ctx.phase_space_failure(err))?;

        let parent = if grouped {
            particles.push(
                FinalStateParticle::stable(group.seed_species, group.seed, hadron.vertex)
                    .with_status(ParticleStatus::DecayedState),
            );
            Parent::Descendant(particles.len() - 1)
        } else {
            Parent::Hadron
        };
        for (member, momentum) in group.members.iter().zip(products) {
            particles.push(
                FinalStateParticle::stable(*member, momentum, hadron.vertex).with_parent(parent),
            );
        }
    }

    let remnant = remnant.with_changes(b - emission.total(), q - emission.protons, -taken)?;
    debug!(
        projectile = %species,
        protons = emission.protons,
        neutrons = emission.neutrons,
        groups = groups.len(),
        "multi-nucleon absorption"
    );

    Ok(FinalState { remnant, particles })
}
