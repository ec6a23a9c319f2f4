use crate::fate::Fate;
use crate::species::Species;
use rand::Rng;

/// Identifies a hadron-nucleon scattering channel for the angular service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterChannel {
    pub projectile: Species,
    pub struck: Species,
    /// Particle whose centre-of-mass angle is being sampled.
    pub scattered: Species,
    /// Charge exchange, inelastic, or absorption on a nucleon pair.
    pub fate: Fate,
}

/// Centre-of-mass angular distributions for hadron-nucleon scattering.
///
/// Implementations return cos(theta) of the scattered particle relative to
/// the projectile direction in the centre-of-mass frame. A value outside
/// `[-1, 1]` signals that no angle could be produced; callers treat it as a
/// recoverable failure and re-draw.
pub trait AngleSampler {
    fn sample_cos_theta<R: Rng + ?Sized>(
        &self,
        channel: &ScatterChannel,
        kinetic_energy: f64,
        rng: &mut R,
    ) -> f64;
}

impl<T: AngleSampler + ?Sized> AngleSampler for &T {
    fn sample_cos_theta<R: Rng + ?Sized>(
        &self,
        channel: &ScatterChannel,
        kinetic_energy: f64,
        rng: &mut R,
    ) -> f64 {
        (**self).sample_cos_theta(channel, kinetic_energy, rng)
    }
}

/// Isotropic centre-of-mass scattering, independent of channel and energy.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsotropicAngles;

impl AngleSampler for IsotropicAngles {
    fn sample_cos_theta<R: Rng + ?Sized>(
        &self,
        _channel: &ScatterChannel,
        _kinetic_energy: f64,
        rng: &mut R,
    ) -> f64 {
        2.0 * rng.gen::<f64>() - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_isotropic_range_and_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let channel = ScatterChannel {
            projectile: Species::PiPlus,
            struck: Species::Proton,
            scattered: Species::PiPlus,
            fate: Fate::Inelastic,
        };
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let mu = IsotropicAngles.sample_cos_theta(&channel, 150.0, &mut rng);
            assert!((-1.0..=1.0).contains(&mu));
            sum += mu;
        }
        assert!((sum / n as f64).abs() < 0.03);
    }
}
