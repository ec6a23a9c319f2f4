use crate::config::TransportConfig;
use crate::remnant::Nucleus;
use crate::species::Species;
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

/// Source of Fermi momenta for nucleons bound in a nucleus.
pub trait NuclearModel {
    /// Three-momentum (GeV) of a bound nucleon of the given species.
    fn sample_momentum<R: Rng + ?Sized>(
        &self,
        target: &Nucleus,
        nucleon: Species,
        rng: &mut R,
    ) -> Vector3<f64>;
}

impl<T: NuclearModel + ?Sized> NuclearModel for &T {
    fn sample_momentum<R: Rng + ?Sized>(
        &self,
        target: &Nucleus,
        nucleon: Species,
        rng: &mut R,
    ) -> Vector3<f64> {
        (**self).sample_momentum(target, nucleon, rng)
    }
}

/// Uniformly filled Fermi sphere of radius `fermi_momentum`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FermiGas {
    pub fermi_momentum: f64,
}

impl FermiGas {
    pub fn new(fermi_momentum: f64) -> Self {
        Self { fermi_momentum }
    }

    /// Fermi sphere with the radius set in `config`.
    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.fermi_momentum)
    }
}

impl From<&TransportConfig> for FermiGas {
    fn from(config: &TransportConfig) -> Self {
        Self::from_config(config)
    }
}

impl Default for FermiGas {
    fn default() -> Self {
        Self::from_config(&TransportConfig::default())
    }
}

impl NuclearModel for FermiGas {
    fn sample_momentum<R: Rng + ?Sized>(
        &self,
        _target: &Nucleus,
        _nucleon: Species,
        rng: &mut R,
    ) -> Vector3<f64> {
        // |p|^2 dp weighting inside the sphere
        let magnitude = self.fermi_momentum * rng.gen::<f64>().cbrt();
        let direction: [f64; 3] = UnitSphere.sample(rng);
        Vector3::from(direction) * magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_momenta_inside_fermi_sphere() {
        let model = FermiGas::new(0.221);
        let c12 = Nucleus::new(12, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut mean = Vector3::zeros();
        for _ in 0..10_000 {
            let p = model.sample_momentum(&c12, Species::Proton, &mut rng);
            assert!(p.norm() <= 0.221 + 1e-12);
            mean += p;
        }
        assert!((mean / 10_000.0).norm() < 0.01);
    }

    #[test]
    fn test_radius_follows_config() {
        let config = TransportConfig {
            fermi_momentum: 0.221,
            ..TransportConfig::default()
        };
        assert_eq!(FermiGas::from_config(&config), FermiGas::new(0.221));
        assert_eq!(FermiGas::from(&TransportConfig::default()), FermiGas::default());
    }
}
