use crate::error::KinematicsError;
use nalgebra::Vector3;
use rand::Rng;
use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Energy-momentum four-vector in GeV.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FourMomentum {
    pub e: f64,
    pub p: Vector3<f64>,
}

impl FourMomentum {
    pub fn new(e: f64, p: Vector3<f64>) -> Self {
        Self { e, p }
    }

    pub fn at_rest(mass: f64) -> Self {
        Self::new(mass, Vector3::zeros())
    }

    /// Pure energy shift with no three-momentum.
    pub fn energy(e: f64) -> Self {
        Self::new(e, Vector3::zeros())
    }

    pub fn on_shell(mass: f64, p: Vector3<f64>) -> Self {
        Self::new((p.norm_squared() + mass * mass).sqrt(), p)
    }

    /// On-shell four-momentum with the given kinetic energy along `direction`.
    pub fn from_kinetic(mass: f64, kinetic: f64, direction: &Vector3<f64>) -> Self {
        let e = mass + kinetic;
        let pmag = (e * e - mass * mass).max(0.0).sqrt();
        let dir = direction.try_normalize(0.0).unwrap_or_else(Vector3::z);
        Self::new(e, dir * pmag)
    }

    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.p.norm_squared()
    }

    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        if m2 > 0.0 {
            m2.sqrt()
        } else {
            0.0
        }
    }

    pub fn momentum(&self) -> f64 {
        self.p.norm()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.e - self.mass()
    }

    /// Velocity of the frame in which this four-momentum is at rest.
    pub fn boost_vector(&self) -> Vector3<f64> {
        self.p / self.e
    }

    /// Lorentz boost by velocity `beta` (units of c).
    pub fn boost(&self, beta: &Vector3<f64>) -> Self {
        let b2 = beta.norm_squared();
        if b2 == 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = beta.dot(&self.p);
        let gamma2 = (gamma - 1.0) / b2;
        Self::new(
            gamma * (self.e + bp),
            self.p + beta * (gamma2 * bp + gamma * self.e),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.e.is_finite() && self.p.iter().all(|c| c.is_finite())
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.e - other.e).abs() <= tolerance
            && (self.p - other.p).iter().all(|c| c.abs() <= tolerance)
    }
}

impl Add for FourMomentum {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.e + rhs.e, self.p + rhs.p)
    }
}

impl Sub for FourMomentum {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.e - rhs.e, self.p - rhs.p)
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        self.e += rhs.e;
        self.p += rhs.p;
    }
}

impl SubAssign for FourMomentum {
    fn sub_assign(&mut self, rhs: Self) {
        self.e -= rhs.e;
        self.p -= rhs.p;
    }
}

impl Neg for FourMomentum {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.e, -self.p)
    }
}

impl Mul<f64> for FourMomentum {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.e * rhs, self.p * rhs)
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + *p)
    }
}

/// Rotate the unit vector `axis` by polar cosine `mu` and azimuth `phi`.
pub fn rotate(axis: &Vector3<f64>, mu: f64, phi: f64) -> Vector3<f64> {
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();

    let perp = if axis.x.abs() < 0.99 {
        Vector3::x().cross(axis).normalize()
    } else {
        Vector3::y().cross(axis).normalize()
    };
    let ortho = axis.cross(&perp);

    mu * axis + sin_theta * phi.cos() * perp + sin_theta * phi.sin() * ortho
}

/// Result of a two-body collision.
///
/// `recoil` is whatever four-momentum the outgoing pair does not carry
/// (non-zero only when a binding energy was removed); the caller hands it
/// to the remnant so the total is conserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBodyFinalState {
    pub first: FourMomentum,
    pub second: FourMomentum,
    pub recoil: FourMomentum,
}

/// Two-body collision `p1 + p2 -> (m3) + (m4)` at a given centre-of-mass angle.
///
/// `cos_theta` is the polar angle of the first outgoing particle measured
/// from the projectile direction in the centre-of-mass frame; the azimuth is
/// drawn uniformly. `binding` (GeV) is subtracted from the available
/// invariant mass before the outgoing momenta are fixed.
pub fn two_body<R: Rng + ?Sized>(
    m3: f64,
    m4: f64,
    p1: &FourMomentum,
    p2: &FourMomentum,
    cos_theta: f64,
    binding: f64,
    rng: &mut R,
) -> Result<TwoBodyFinalState, KinematicsError> {
    if !(-1.0..=1.0).contains(&cos_theta) {
        return Err(KinematicsError::UnphysicalAngle(cos_theta));
    }

    let total = *p1 + *p2;
    let s = total.mass2();
    let required = m3 + m4;
    if !(s > 0.0) || total.e <= 0.0 {
        return Err(KinematicsError::BelowThreshold {
            available: 0.0,
            required,
        });
    }
    let w = s.sqrt() - binding;
    if w < required {
        return Err(KinematicsError::BelowThreshold {
            available: w,
            required,
        });
    }

    let beta = total.boost_vector();
    let projectile_cm = p1.boost(&-beta);
    let axis = projectile_cm
        .p
        .try_normalize(1e-12)
        .or_else(|| total.p.try_normalize(1e-12))
        .unwrap_or_else(Vector3::z);

    let e3 = (w * w + m3 * m3 - m4 * m4) / (2.0 * w);
    let pcm = (e3 * e3 - m3 * m3).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.gen::<f64>();
    let dir = rotate(&axis, cos_theta, phi);

    let first = FourMomentum::new(e3, dir * pcm).boost(&beta);
    let second = FourMomentum::new(w - e3, -dir * pcm).boost(&beta);
    let recoil = total - first - second;

    if !(first.is_finite() && second.is_finite()) {
        return Err(KinematicsError::BelowThreshold {
            available: w,
            required,
        });
    }

    Ok(TwoBodyFinalState {
        first,
        second,
        recoil,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pion(kinetic: f64) -> FourMomentum {
        FourMomentum::from_kinetic(0.13957, kinetic, &Vector3::z())
    }

    #[test]
    fn test_boost_round_trip() {
        let p = FourMomentum::on_shell(0.938, Vector3::new(0.1, -0.2, 0.5));
        let beta = Vector3::new(0.3, 0.1, -0.4);
        let back = p.boost(&beta).boost(&-beta);
        assert!(back.approx_eq(&p, 1e-12));
        assert!((p.boost(&beta).mass() - 0.938).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_preserves_angle() {
        let axis = Vector3::new(0.0, 0.6, 0.8);
        let out = rotate(&axis, 0.3, 1.1);
        assert!((out.norm() - 1.0).abs() < 1e-12);
        assert!((out.dot(&axis) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_two_body_conserves_four_momentum() {
        let mut rng = StdRng::seed_from_u64(7);
        let p1 = pion(0.3);
        let p2 = FourMomentum::on_shell(0.938272, Vector3::new(0.05, 0.1, -0.08));
        for i in 0..50 {
            let cos = -1.0 + 2.0 * (i as f64) / 49.0;
            let fs = two_body(0.13957, 0.938272, &p1, &p2, cos, 0.0, &mut rng).unwrap();
            let out = fs.first + fs.second;
            assert!(out.approx_eq(&(p1 + p2), 1e-9));
            assert!(fs.recoil.approx_eq(&FourMomentum::default(), 1e-9));
            assert!((fs.first.mass() - 0.13957).abs() < 1e-6);
            assert!((fs.second.mass() - 0.938272).abs() < 1e-6);
        }
    }

    #[test]
    fn test_forward_angle_keeps_direction() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = pion(0.5);
        let p2 = FourMomentum::at_rest(0.938272);
        let fs = two_body(0.13957, 0.938272, &p1, &p2, 1.0, 0.0, &mut rng).unwrap();
        assert!((fs.first.e - p1.e).abs() < 1e-9);
        assert!(fs.first.p.x.abs() < 1e-9 && fs.first.p.y.abs() < 1e-9);
    }

    #[test]
    fn test_binding_goes_to_recoil() {
        let mut rng = StdRng::seed_from_u64(3);
        let p1 = pion(0.2);
        let p2 = FourMomentum::at_rest(2.0 * 0.938);
        let fs = two_body(0.938, 0.938, &p1, &p2, 0.2, 0.075, &mut rng).unwrap();
        let total = p1 + p2;
        assert!((fs.first + fs.second + fs.recoil).approx_eq(&total, 1e-9));
        assert!(fs.recoil.e > 0.0);
        assert!(((fs.first + fs.second).mass() - (total.mass() - 0.075)).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let mut rng = StdRng::seed_from_u64(3);
        let p1 = pion(0.01);
        let p2 = FourMomentum::at_rest(0.938);
        assert_eq!(
            two_body(0.13957, 0.938, &p1, &p2, 1.5, 0.0, &mut rng),
            Err(KinematicsError::UnphysicalAngle(1.5))
        );
        assert!(matches!(
            two_body(0.938, 0.938, &p1, &p2, 0.0, 0.0, &mut rng),
            Err(KinematicsError::BelowThreshold { .. })
        ));
    }
}
