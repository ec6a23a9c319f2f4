//! Hadron-nucleus elastic scattering.
//!
//! The polar angle comes from one of two empirical angular densities, one for
//! pions (Freedman, Miller and Henley, Nucl. Phys. A389 (1982) 457) and one
//! for nucleons (800 MeV p + O16, Adams et al., PRL 1979). The hadron then
//! scatters off the remnant as a whole.

use crate::angular::AngleSampler;
use crate::context::GeneratorContext;
use crate::data::DEG_TO_RAD;
use crate::error::{EscapeReason, GenerateError};
use crate::kinematics::two_body;
use crate::nuclear_model::NuclearModel;
use crate::particle::{FinalState, FinalStateParticle, Hadron};
use crate::remnant::RemnantNucleus;
use crate::species::{Family, Species};
use rand::Rng;
use tracing::debug;

/// Tabulated angular density on a uniform degree grid starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularTable {
    density: &'static [f64],
    bin_width: f64,
    normalization: f64,
    /// Number of integer-degree steps scanned (angles 0.5, 1.5, ...).
    scan_steps: usize,
}

pub const PION_ELASTIC: AngularTable = AngularTable {
    density: &[
        5000., 4200., 3000., 2600., 2100., 1800., 1200., 750., 500., 230., 120., 35., 9., 3.,
        11., 18., 29., 27., 20., 14., 10., 6., 2., 0.14, 0.19,
    ],
    bin_width: 2.5,
    normalization: 47979.453,
    scan_steps: 60,
};

pub const NUCLEON_ELASTIC: AngularTable = AngularTable {
    density: &[
        2400., 2350., 2200., 2000., 1728., 1261., 713., 312., 106., 35., 6., 5., 10., 12., 11.,
        9., 6., 1., 1., 1.,
    ],
    bin_width: 1.0,
    normalization: 11967.0,
    scan_steps: 20,
};

impl AngularTable {
    /// Interpolated, unnormalized density at `theta` degrees.
    ///
    /// Angles past the last grid point extrapolate the final bin.
    pub fn density_at(&self, theta: f64) -> f64 {
        let last_bin = self.density.len() - 2;
        let j = ((theta / self.bin_width).floor().max(0.0) as usize).min(last_bin);
        let low = j as f64 * self.bin_width;
        let fraction = (theta - low) / self.bin_width;
        self.density[j] + fraction * (self.density[j + 1] - self.density[j])
    }

    /// Scan the cumulative density until it exceeds `r`; returns radians.
    ///
    /// If the scan ends before the sum reaches `r` the last scanned angle is
    /// returned.
    pub fn theta_for(&self, r: f64) -> f64 {
        let mut sum = 0.0;
        let mut theta = 0.5;
        for i in 0..self.scan_steps {
            theta = i as f64 + 0.5;
            sum += self.density_at(theta) / self.normalization;
            if sum > r {
                break;
            }
        }
        theta * DEG_TO_RAD
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.theta_for(rng.gen::<f64>())
    }
}

/// Table used for a projectile: nucleons get the nucleon table, everything else the pion one.
pub fn table_for(species: Species) -> &'static AngularTable {
    match species.family() {
        Family::Nucleon => &NUCLEON_ELASTIC,
        _ => &PION_ELASTIC,
    }
}

/// Polar elastic-scattering angle (radians) for a projectile species.
pub fn sample_elastic_angle<R: Rng + ?Sized>(species: Species, rng: &mut R) -> f64 {
    table_for(species).sample(rng)
}

/// Scatter `hadron` elastically off the whole remnant.
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

    // an untouched target is on its ground state; otherwise use the remnant's invariant mass
    let target_mass = if remnant.a() == ctx.target.a {
        ctx.target.mass()
    } else {
        remnant.mass()
    };

    let theta = sample_elastic_angle(hadron.species, rng);
    let fs = two_body(
        hadron.species.mass(),
        target_mass,
        &hadron.momentum,
        remnant.momentum(),
        theta.cos(),
        0.0,
        rng,
    )?;
    debug!(species = %hadron.species, theta, "elastic scatter");

    Ok(FinalState {
        remnant: remnant.with_momentum(fs.second + fs.recoil)?,
        particles: vec![FinalStateParticle::stable(
            hadron.species,
            fs.first,
            hadron.vertex,
        )],
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

    #[test]
    fn test_zero_draw_gives_first_midpoint() {
        let mut rng = ScriptedRng::new(&[0.0]);
        assert_eq!(sample_elastic_angle(Species::PiPlus, &mut rng), 0.5 * DEG_TO_RAD);
        let mut rng = ScriptedRng::new(&[0.0]);
        assert_eq!(sample_elastic_angle(Species::Proton, &mut rng), 0.5 * DEG_TO_RAD);
    }

    #[test]
    fn test_large_draw_terminates_at_last_scanned_angle() {
        assert_eq!(PION_ELASTIC.theta_for(1.0), 59.5 * DEG_TO_RAD);
        assert_eq!(PION_ELASTIC.theta_for(5.0), 59.5 * DEG_TO_RAD);
        assert_eq!(NUCLEON_ELASTIC.theta_for(5.0), 19.5 * DEG_TO_RAD);
    }

    #[test]
    fn test_interpolation_between_bins() {
        // pion bins 0 and 1 are 5000 and 4200, 0.5 degrees is a fifth of the way
        assert!((PION_ELASTIC.density_at(0.5) - 4840.0).abs() < 1e-9);
        assert!((NUCLEON_ELASTIC.density_at(0.5) - 2375.0).abs() < 1e-9);
    }

    #[test]
    fn test_angles_are_forward_peaked() {
        let mut rng = StdRng::seed_from_u64(4);
        let n = 5000;
        let forward = (0..n)
            .filter(|_| sample_elastic_angle(Species::PiMinus, &mut rng) < 10.0 * DEG_TO_RAD)
            .count();
        assert!(forward as f64 / n as f64 > 0.6);
        assert!(std::ptr::eq(table_for(Species::KPlus), &PION_ELASTIC));
    }

    #[test]
    fn test_elastic_conserves_and_keeps_composition() {
        let setup = Setup::new(12, 6);
        let ctx = setup.ctx();
        let remnant = RemnantNucleus::from_target(&setup.target);
        let hadron = Hadron::with_kinetic_energy(
            Species::Proton,
            0.2,
            &Vector3::new(0.0, 0.0, 1.0),
            [0.0; 4],
        );
        let mut rng = StdRng::seed_from_u64(21);
        let fs = generate(&ctx, &hadron, &remnant, &mut rng).unwrap();

        assert_eq!(fs.particles.len(), 1);
        assert_eq!((fs.remnant.a(), fs.remnant.z()), (12, 6));
        let total_in = hadron.momentum + *remnant.momentum();
        let total_out = fs.particles[0].momentum + *fs.remnant.momentum();
        assert!(total_in.approx_eq(&total_out, 1e-6));
        assert!((fs.remnant.mass() - setup.target.mass()).abs() < 1e-6);
        assert!(fs.particles[0].kinetic_energy() <= hadron.kinetic_energy() + 1e-9);
    }

    #[test]
    fn test_empty_remnant_is_terminal() {
        let setup = Setup::new(12, 6);
        let empty = RemnantNucleus::new(0, 0, FourMomentum::default()).unwrap();
        let hadron = Hadron::with_kinetic_energy(Species::PiPlus, 0.1, &Vector3::z(), [0.0; 4]);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            generate(&setup.ctx(), &hadron, &empty, &mut rng),
            Err(GenerateError::Terminal(EscapeReason::InsufficientNucleons { .. }))
        ));
    }
}
