use crate::kinematics::FourMomentum;
use crate::particle::{FinalStateParticle, Hadron, Parent, ParticleStatus};
use crate::species::Species;

/// One line of the event record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub species: Species,
    pub status: ParticleStatus,
    pub mother: Option<usize>,
    pub momentum: FourMomentum,
    pub vertex: [f64; 4],
}

/// Append-only list of every particle in an event, linked by mother index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    entries: Vec<RecordEntry>,
}

impl EventRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a particle and return its index.
    pub fn append(
        &mut self,
        species: Species,
        status: ParticleStatus,
        mother: Option<usize>,
        momentum: FourMomentum,
        vertex: [f64; 4],
    ) -> usize {
        self.entries.push(RecordEntry {
            species,
            status,
            mother,
            momentum,
            vertex,
        });
        self.entries.len() - 1
    }

    pub fn append_hadron(&mut self, hadron: &Hadron, mother: Option<usize>) -> usize {
        self.append(
            hadron.species,
            hadron.status,
            mother,
            hadron.momentum,
            hadron.vertex,
        )
    }

    /// Append the output of one transport step, resolving parent links.
    ///
    /// Returns the record index of each descendant, in order.
    pub fn append_descendants(
        &mut self,
        hadron_index: Option<usize>,
        descendants: &[FinalStateParticle],
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = Vec::with_capacity(descendants.len());
        for particle in descendants {
            let mother = match particle.parent {
                Parent::Hadron => hadron_index,
                Parent::Descendant(k) => indices.get(k).copied(),
            };
            let index = self.append(
                particle.species,
                particle.status,
                mother,
                particle.momentum,
                particle.vertex,
            );
            indices.push(index);
        }
        indices
    }

    pub fn get(&self, index: usize) -> Option<&RecordEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordEntry> {
        self.entries.iter()
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.mother == Some(index))
            .map(|(i, _)| i)
    }

    pub fn final_state(&self) -> impl Iterator<Item = &RecordEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == ParticleStatus::StableFinalState)
    }

    /// Summed four-momentum of the stable final-state particles.
    pub fn final_state_momentum(&self) -> FourMomentum {
        self.final_state().map(|e| e.momentum).sum()
    }

    pub fn final_state_charge(&self) -> i32 {
        self.final_state().map(|e| e.species.charge()).sum()
    }

    pub fn final_state_baryon_number(&self) -> i32 {
        self.final_state().map(|e| e.species.baryon_number()).sum()
    }
}
