//! N-body phase-space decay (Raubold-Lynch) with weight rejection.
//!
//! A parent four-momentum is split into `n` on-shell products distributed
//! uniformly in Lorentz-invariant phase space. Raw events are weighted; the
//! weight ceiling is estimated from a short pre-sample and events are then
//! accepted with probability `weight / ceiling`, so the returned momenta are
//! unweighted.

use crate::error::KinematicsError;
use crate::kinematics::FourMomentum;
use nalgebra::Vector3;
use rand::Rng;
use std::f64::consts::PI;

/// Largest number of products a single decay may produce.
pub const MAX_PRODUCTS: usize = 18;

/// Raw events drawn to estimate the weight ceiling.
const WEIGHT_PRESAMPLE: usize = 200;

/// Momentum of either daughter when a system of mass `a` splits into `b` and `c`.
fn pdk(a: f64, b: f64, c: f64) -> f64 {
    let x = (a - b - c) * (a + b + c) * (a - b + c) * (a + b - c);
    if x > 0.0 {
        x.sqrt() / (2.0 * a)
    } else {
        0.0
    }
}

struct Setup<'a> {
    masses: &'a [f64],
    kinetic: f64,
}

impl<'a> Setup<'a> {
    /// Draw the ordered intermediate invariant masses and the event weight.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, f64) {
        let n = self.masses.len();
        let mut rno: Vec<f64> = Vec::with_capacity(n);
        rno.push(0.0);
        for _ in 1..n - 1 {
            rno.push(rng.gen::<f64>());
        }
        rno.push(1.0);
        rno[1..n - 1].sort_by(|a, b| a.total_cmp(b));

        let mut inv_mass = Vec::with_capacity(n);
        let mut sum = 0.0;
        for (i, m) in self.masses.iter().enumerate() {
            sum += m;
            inv_mass.push(rno[i] * self.kinetic + sum);
        }

        let weight = (0..n - 1)
            .map(|i| pdk(inv_mass[i + 1], inv_mass[i], self.masses[i + 1]))
            .product();
        (inv_mass, weight)
    }

    /// Build the product momenta for accepted intermediate masses, in the parent frame.
    fn build<R: Rng + ?Sized>(&self, inv_mass: &[f64], rng: &mut R) -> Vec<FourMomentum> {
        let n = self.masses.len();
        let pd: Vec<f64> = (0..n - 1)
            .map(|i| pdk(inv_mass[i + 1], inv_mass[i], self.masses[i + 1]))
            .collect();

        let mut products = Vec::with_capacity(n);
        products.push(FourMomentum::on_shell(
            self.masses[0],
            Vector3::new(0.0, pd[0], 0.0),
        ));

        let mut i = 1;
        loop {
            products.push(FourMomentum::on_shell(
                self.masses[i],
                Vector3::new(0.0, -pd[i - 1], 0.0),
            ));

            let cos_z = 2.0 * rng.gen::<f64>() - 1.0;
            let sin_z = (1.0 - cos_z * cos_z).max(0.0).sqrt();
            let ang_y = 2.0 * PI * rng.gen::<f64>();
            let (sin_y, cos_y) = ang_y.sin_cos();
            for p in products.iter_mut() {
                let (x, y) = (p.p.x, p.p.y);
                p.p.x = cos_z * x - sin_z * y;
                p.p.y = sin_z * x + cos_z * y;
                let (x, z) = (p.p.x, p.p.z);
                p.p.x = cos_y * x - sin_y * z;
                p.p.z = sin_y * x + cos_y * z;
            }

            if i == n - 1 {
                break;
            }

            let beta = pd[i] / (pd[i] * pd[i] + inv_mass[i] * inv_mass[i]).sqrt();
            let boost = Vector3::new(0.0, beta, 0.0);
            for p in products.iter_mut() {
                *p = p.boost(&boost);
            }
            i += 1;
        }
        products
    }
}

/// Decay `parent` into products of the given `masses`.
///
/// Fails when the parent's invariant mass cannot cover the product masses,
/// when the product count is outside `2..=MAX_PRODUCTS`, or when no event is
/// accepted within `max_attempts` weighted draws.
pub fn decay<R: Rng + ?Sized>(
    parent: &FourMomentum,
    masses: &[f64],
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec<FourMomentum>, KinematicsError> {
    let n = masses.len();
    if !(2..=MAX_PRODUCTS).contains(&n) {
        return Err(KinematicsError::PhaseSpace {
            products: n,
            reason: format!("product count must lie in 2..={}", MAX_PRODUCTS),
        });
    }
    let total_mass: f64 = masses.iter().sum();
    let w = parent.mass();
    if parent.mass2() <= 0.0 || w <= total_mass {
        return Err(KinematicsError::PhaseSpace {
            products: n,
            reason: format!(
                "invariant mass {:.6} GeV does not exceed product masses {:.6} GeV",
                w, total_mass
            ),
        });
    }

    let setup = Setup {
        masses,
        kinetic: w - total_mass,
    };

    let mut ceiling = 0.0_f64;
    for _ in 0..WEIGHT_PRESAMPLE {
        ceiling = ceiling.max(setup.draw(rng).1);
    }
    ceiling *= 2.0;
    if !(ceiling > 0.0) {
        return Err(KinematicsError::PhaseSpace {
            products: n,
            reason: "phase-space weight vanishes".to_string(),
        });
    }

    let beta = parent.boost_vector();
    for _ in 0..max_attempts {
        let (inv_mass, weight) = setup.draw(rng);
        if weight > ceiling {
            tracing::debug!(weight, ceiling, "phase-space weight above estimated ceiling");
        }
        if ceiling * rng.gen::<f64>() > weight {
            continue;
        }
        return Ok(setup
            .build(&inv_mass, rng)
            .into_iter()
            .map(|p| p.boost(&beta))
            .collect());
    }

    Err(KinematicsError::PhaseSpace {
        products: n,
        reason: format!("no event accepted in {} attempts", max_attempts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MN: f64 = 0.938;

    fn assert_conserved(parent: &FourMomentum, masses: &[f64], products: &[FourMomentum]) {
        assert_eq!(products.len(), masses.len());
        let sum: FourMomentum = products.iter().sum();
        assert!(sum.approx_eq(parent, 1e-8), "{:?} vs {:?}", sum, parent);
        for (p, m) in products.iter().zip(masses) {
            assert!((p.mass() - m).abs() < 1e-6);
        }
    }

    #[test]
    fn test_three_body_decay_conserves() {
        let mut rng = StdRng::seed_from_u64(11);
        let parent = FourMomentum::on_shell(2.5, Vector3::new(0.3, -0.1, 0.9));
        let masses = [MN, MN, 0.13957];
        for _ in 0..20 {
            let products = decay(&parent, &masses, 1000, &mut rng).unwrap();
            assert_conserved(&parent, &masses, &products);
        }
    }

    #[test]
    fn test_eighteen_body_decay_conserves() {
        let mut rng = StdRng::seed_from_u64(5);
        let masses = [MN; MAX_PRODUCTS];
        let parent = FourMomentum::on_shell(18.0 * MN + 0.4, Vector3::new(0.0, 0.0, 0.5));
        let products = decay(&parent, &masses, 100_000, &mut rng).unwrap();
        assert_conserved(&parent, &masses, &products);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut rng = StdRng::seed_from_u64(5);
        let parent = FourMomentum::at_rest(1.0);
        assert!(decay(&parent, &[MN], 10, &mut rng).is_err());
        assert!(decay(&parent, &[MN, MN], 10, &mut rng).is_err());
        assert!(decay(&parent, &[0.1; MAX_PRODUCTS + 1], 10, &mut rng).is_err());
    }

    #[test]
    fn test_pdk_two_body_momentum() {
        // 1 GeV at rest into two massless daughters: each carries 0.5 GeV
        assert!((pdk(1.0, 0.0, 0.0) - 0.5).abs() < 1e-12);
        assert_eq!(pdk(1.0, 0.6, 0.6), 0.0);
    }
}
