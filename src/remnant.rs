use crate::data::nucleus_mass;
use crate::error::RemnantError;
use crate::kinematics::FourMomentum;
use crate::species::Species;

/// Target nucleus identity (mass number and proton number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nucleus {
    pub a: i32,
    pub z: i32,
}

impl Nucleus {
    pub fn new(a: i32, z: i32) -> Result<Self, RemnantError> {
        if a < 1 || z < 0 || z > a {
            return Err(RemnantError::Composition { a, z });
        }
        Ok(Self { a, z })
    }

    pub fn neutrons(&self) -> i32 {
        self.a - self.z
    }

    /// Ground-state mass in GeV.
    pub fn mass(&self) -> f64 {
        nucleus_mass(self.a, self.z)
    }
}

/// The residual nucleus left behind by successive interactions.
///
/// Every constructor and update validates `0 <= Z <= A`, `A >= 0` and a finite
/// four-momentum, so a value of this type is always a legal remnant. Updates
/// return a new value; callers commit by replacing the old one only after the
/// whole final state has been generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemnantNucleus {
    a: i32,
    z: i32,
    momentum: FourMomentum,
}

impl RemnantNucleus {
    pub fn new(a: i32, z: i32, momentum: FourMomentum) -> Result<Self, RemnantError> {
        let remnant = Self { a, z, momentum };
        remnant.validate()?;
        Ok(remnant)
    }

    /// The untouched target, at rest.
    pub fn from_target(target: &Nucleus) -> Self {
        Self {
            a: target.a,
            z: target.z,
            momentum: FourMomentum::at_rest(target.mass()),
        }
    }

    pub fn validate(&self) -> Result<(), RemnantError> {
        if self.a < 0 || self.z < 0 || self.z > self.a {
            return Err(RemnantError::Composition {
                a: self.a,
                z: self.z,
            });
        }
        if !self.momentum.is_finite() {
            return Err(RemnantError::NonFiniteMomentum);
        }
        Ok(())
    }

    pub fn a(&self) -> i32 {
        self.a
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn neutrons(&self) -> i32 {
        self.a - self.z
    }

    pub fn momentum(&self) -> &FourMomentum {
        &self.momentum
    }

    /// Invariant mass of the remnant four-momentum.
    pub fn mass(&self) -> f64 {
        self.momentum.mass()
    }

    /// Z/A, or zero for an empty remnant.
    pub fn proton_fraction(&self) -> f64 {
        if self.a > 0 {
            self.z as f64 / self.a as f64
        } else {
            0.0
        }
    }

    /// Number of nucleons of the given species still bound.
    pub fn count(&self, nucleon: Species) -> i32 {
        match nucleon {
            Species::Proton => self.z,
            Species::Neutron => self.neutrons(),
            _ => 0,
        }
    }

    pub fn has(&self, nucleon: Species) -> bool {
        self.count(nucleon) > 0
    }

    /// Staged update: a new remnant with shifted composition and momentum.
    pub fn with_changes(
        &self,
        delta_a: i32,
        delta_z: i32,
        delta_p: FourMomentum,
    ) -> Result<Self, RemnantError> {
        Self::new(self.a + delta_a, self.z + delta_z, self.momentum + delta_p)
    }

    pub fn with_momentum(&self, momentum: FourMomentum) -> Result<Self, RemnantError> {
        Self::new(self.a, self.z, momentum)
    }
}
