//! Statistical model for the number of nucleons emitted in multi-body absorption.
//!
//! The sum `ns = np + nn` and difference `nd = np - nn` are drawn from fits to
//! hadron-nucleon cascade simulations (p and pi+ on C, Fe and Pb at a few
//! hundred MeV); other projectiles follow by isospin. Nucleon projectiles draw
//! `ns` from an exponential, pions and kaons from a Gaussian weighted by a
//! linear density. `nd` is Gaussian for every projectile.

use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::species::{Family, Species};
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

/// Largest number of nucleons a single absorption may emit.
pub const MAX_EMITTED: i32 = 85;

/// Accepted emission: protons and neutrons leaving the nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub protons: i32,
    pub neutrons: i32,
}

impl Multiplicity {
    pub fn total(&self) -> i32 {
        self.protons + self.neutrons
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SumModel {
    Exponential { rate: f64 },
    Gaussian { mean: f64, sigma: f64, max: f64 },
}

/// Fitted multiplicity distribution for one projectile on one remnant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplicityModel {
    sum: SumModel,
    diff_mean: f64,
    diff_sigma: f64,
    nucleon_projectile: bool,
}

/// Draw limits for [`MultiplicityModel::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawLimits {
    pub multiplicity_draws: u32,
    pub sum_draws: u32,
}

/// Uniform in (0, 1), never exactly zero.
fn nonzero_uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u != 0.0 {
            return u;
        }
    }
}

/// Box-Muller pair `(cos branch, sin branch)` from two uniforms.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let u1 = nonzero_uniform(rng);
    let u2 = nonzero_uniform(rng);
    let radius = (-2.0 * u1.ln()).sqrt();
    let angle = 2.0 * PI * u2;
    (radius * angle.cos(), radius * angle.sin())
}

/// Scale an oversized emission down to [`MAX_EMITTED`], keeping the p:n ratio.
pub fn cap_multiplicity(m: Multiplicity) -> Multiplicity {
    let total = m.total();
    if total <= MAX_EMITTED {
        return m;
    }
    let frac = MAX_EMITTED as f64 / total as f64;
    Multiplicity {
        protons: (m.protons as f64 * frac) as i32,
        neutrons: (m.neutrons as f64 * frac) as i32,
    }
}

/// Keep at least one nucleon bound when the draw would empty the nucleus.
pub fn leave_one_bound<R: Rng + ?Sized>(
    m: Multiplicity,
    available: Multiplicity,
    rng: &mut R,
) -> Multiplicity {
    if m != available || m.total() == 0 {
        return m;
    }
    let mut m = m;
    if rng.gen::<f64>() < m.protons as f64 / m.total() as f64 {
        m.protons -= 1;
    } else {
        m.neutrons -= 1;
    }
    m
}

impl MultiplicityModel {
    /// Fit for `projectile` with kinetic energy `kinetic_energy` (MeV) on a
    /// remnant of `a` nucleons and `z` protons (before the projectile merges).
    pub fn for_projectile(
        projectile: Species,
        a: i32,
        z: i32,
        kinetic_energy: f64,
    ) -> Option<Self> {
        let af = a as f64;
        let zf = z as f64;
        let n = af - zf;
        let t = kinetic_energy;

        let (sum, mut diff_mean, diff_sigma) = match projectile.family() {
            Family::Nucleon => {
                let diff_mean = if n > zf {
                    135.227 * (-7.124 * n / af).exp() - 2.762
                } else {
                    -135.227 * (-7.124 * zf / af).exp() + 4.914
                };
                let c1 = 0.041 + t * 0.0001525;
                let c2 = -0.003444 - t * 0.00002324;
                let c3 = 0.064 - t * 0.00002993;
                let rate = c1 * (c2 * af).exp() + c3;
                (
                    SumModel::Exponential { rate },
                    diff_mean,
                    2.034 + af * 0.007846,
                )
            }
            Family::Pion | Family::Kaon => {
                let scale = 1.0 + t / 250.0;
                let mean = 0.0001 * scale * (af - 50.0).powi(2) + 8.0;
                let sigma = (10.0 + 4.0 * t / 250.0) * (1.0 - (-0.02 * af).exp());
                let max = (mean + 20.0 * sigma).min(af);
                (
                    SumModel::Gaussian { mean, sigma, max },
                    scale - (af / 200.0) * (1.0 + 2.0 * t / 250.0),
                    4.0 * (1.0 - (-0.03 * t).exp()),
                )
            }
            Family::Photon => return None,
        };

        // isospin rotation from the fitted p and pi+ cases
        match projectile {
            Species::PiZero | Species::Neutron => diff_mean -= 2.0,
            Species::PiMinus => diff_mean -= 4.0,
            _ => {}
        }

        Some(Self {
            sum,
            diff_mean,
            diff_sigma,
            nucleon_projectile: projectile.is_nucleon(),
        })
    }

    fn sample_sum<R: Rng + ?Sized>(
        &self,
        max_draws: u32,
        rng: &mut R,
    ) -> Result<f64, KinematicsError> {
        match self.sum {
            SumModel::Exponential { rate } => Ok(-nonzero_uniform(rng).ln() / rate),
            SumModel::Gaussian { mean, sigma, max } => {
                for _ in 0..max_draws {
                    let (x1, _) = box_muller(rng);
                    let ns = mean + sigma * x1;
                    if ns > max || ns < 0.0 {
                        continue;
                    }
                    if rng.gen::<f64>() > ns / max {
                        continue;
                    }
                    return Ok(ns);
                }
                Err(KinematicsError::SamplingNotConverged {
                    what: "absorption nucleon sum",
                    draws: max_draws,
                })
            }
        }
    }

    /// Draw an emission no larger than `available` (protons and neutrons in
    /// the remnant once the projectile has merged into it).
    ///
    /// A non-converging inner sum draw is recoverable; running out of outer
    /// draws is terminal.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        available: Multiplicity,
        limits: DrawLimits,
        rng: &mut R,
    ) -> Result<Multiplicity, GenerateError> {
        for _ in 0..limits.multiplicity_draws {
            let (_, x2) = box_muller(rng);
            let ns = self.sample_sum(limits.sum_draws, rng)?;
            let nd = self.diff_mean + self.diff_sigma * x2;

            // truncation toward zero after the half-unit shift
            let m = Multiplicity {
                protons: ((ns + nd) / 2.0 + 0.5) as i32,
                neutrons: ((ns - nd) / 2.0 + 0.5) as i32,
            };

            if m.protons < 0 || m.neutrons < 0 {
                continue;
            }
            if m.total() < 2 || (m.total() == 2 && self.nucleon_projectile) {
                continue;
            }
            if m.protons > available.protons || m.neutrons > available.neutrons {
                continue;
            }

            let capped = cap_multiplicity(m);
            let accepted = leave_one_bound(capped, available, rng);
            debug!(
                ns,
                nd,
                protons = accepted.protons,
                neutrons = accepted.neutrons,
                "absorption multiplicity"
            );
            return Ok(accepted);
        }

        Err(EscapeReason::MultiplicityNotFound.into())
    }
}
