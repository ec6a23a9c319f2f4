use crate::kinematics::FourMomentum;
use crate::remnant::RemnantNucleus;
use crate::species::Species;
use nalgebra::Vector3;

/// Status code attached to every particle in the event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleStatus {
    /// Still inside the nucleus and subject to further transport.
    HadronInNucleus,
    StableFinalState,
    /// Intermediate system that was decayed into its children.
    DecayedState,
}

/// A hadron at an interaction point inside the nucleus.
#[derive(Debug, Clone, PartialEq)]
pub struct Hadron {
    pub species: Species,
    pub momentum: FourMomentum,
    /// Space-time position (x, y, z, t).
    pub vertex: [f64; 4],
    pub status: ParticleStatus,
}

impl Hadron {
    pub fn new(species: Species, momentum: FourMomentum, vertex: [f64; 4]) -> Self {
        Self {
            species,
            momentum,
            vertex,
            status: ParticleStatus::HadronInNucleus,
        }
    }

    /// On-shell hadron with kinetic energy `kinetic` (GeV) along `direction`.
    pub fn with_kinetic_energy(
        species: Species,
        kinetic: f64,
        direction: &Vector3<f64>,
        vertex: [f64; 4],
    ) -> Self {
        Self::new(
            species,
            FourMomentum::from_kinetic(species.mass(), kinetic, direction),
            vertex,
        )
    }

    /// Kinetic energy in GeV, relative to the species rest mass.
    pub fn kinetic_energy(&self) -> f64 {
        self.momentum.e - self.species.mass()
    }

    pub fn kinetic_energy_mev(&self) -> f64 {
        self.kinetic_energy() * crate::data::MEV_PER_GEV
    }
}

/// Who produced a final-state particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The hadron passed to the transport step.
    Hadron,
    /// An earlier entry in the same descendant list.
    Descendant(usize),
}

/// A particle produced by one transport step.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalStateParticle {
    pub species: Species,
    pub status: ParticleStatus,
    pub parent: Parent,
    pub momentum: FourMomentum,
    pub vertex: [f64; 4],
}

impl FinalStateParticle {
    pub fn stable(species: Species, momentum: FourMomentum, vertex: [f64; 4]) -> Self {
        Self {
            species,
            status: ParticleStatus::StableFinalState,
            parent: Parent::Hadron,
            momentum,
            vertex,
        }
    }

    pub fn with_status(mut self, status: ParticleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_parent(mut self, parent: Parent) -> Self {
        self.parent = parent;
        self
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.momentum.e - self.species.mass()
    }

    /// Continue transporting this particle as a hadron inside the nucleus.
    pub fn to_hadron(&self) -> Hadron {
        Hadron::new(self.species, self.momentum, self.vertex)
    }
}

/// A generator's proposed outcome: the particles it produced and the
/// remnant as it would be after they leave. Nothing is applied until the
/// transport controller commits it.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalState {
    pub remnant: RemnantNucleus,
    pub particles: Vec<FinalStateParticle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadron_kinetic_energy() {
        let h = Hadron::with_kinetic_energy(
            Species::PiPlus,
            0.25,
            &Vector3::new(0.0, 0.0, 2.0),
            [0.0; 4],
        );
        assert!((h.kinetic_energy() - 0.25).abs() < 1e-12);
        assert!((h.kinetic_energy_mev() - 250.0).abs() < 1e-9);
        assert!(h.momentum.p.x.abs() < 1e-15 && h.momentum.p.z > 0.0);
        assert_eq!(h.status, ParticleStatus::HadronInNucleus);
    }

    #[test]
    fn test_final_state_particle_builders() {
        let p = FinalStateParticle::stable(Species::Proton, FourMomentum::at_rest(0.938), [1.0; 4])
            .with_parent(Parent::Descendant(2))
            .with_status(ParticleStatus::HadronInNucleus);
        assert_eq!(p.parent, Parent::Descendant(2));
        let h = p.to_hadron();
        assert_eq!(h.species, Species::Proton);
        assert_eq!(h.vertex, [1.0; 4]);
    }
}
