//! The transport controller: fate selection, dispatch to the final-state
//! generators, retries, and commit of the remnant.

use crate::absorption;
use crate::angular::AngleSampler;
use crate::bank::HadronBank;
use crate::config::TransportConfig;
use crate::context::GeneratorContext;
use crate::elastic;
use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::fast_rng::EventRng;
use crate::fate::{select_fate, Fate};
use crate::fate_table::FateFractions;
use crate::inelastic;
use crate::nuclear_model::NuclearModel;
use crate::particle::{FinalState, FinalStateParticle, Hadron, ParticleStatus};
use crate::pion_production;
use crate::record::EventRecord;
use crate::remnant::{Nucleus, RemnantNucleus};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// How a transport step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A final state was generated and the remnant updated.
    Interacted,
    /// The hadron left the nucleus unchanged.
    Escaped(EscapeReason),
    /// Every attempt failed recoverably; the hadron left the nucleus unchanged.
    GaveUp {
        attempts: u32,
        last_error: Option<KinematicsError>,
    },
}

/// Result of [`HadronTransport::select_and_generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Fate of the last attempt.
    pub fate: Fate,
    pub outcome: Outcome,
    /// Particles to append to the event record, parented to the hadron.
    pub descendants: Vec<FinalStateParticle>,
    pub attempts: u32,
}

impl Interaction {
    pub fn interacted(&self) -> bool {
        self.outcome == Outcome::Interacted
    }
}

/// One cascade: the event record, the final remnant and the fate and
/// outcome of every transport step in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub record: EventRecord,
    pub remnant: RemnantNucleus,
    pub steps: Vec<(Fate, Outcome)>,
}

/// Hadron-nucleus transport for one event.
///
/// The engine owns the remnant nucleus. Each hadron handed to
/// [`select_and_generate`](Self::select_and_generate) is finalized in a
/// single call; the remnant only changes when a final state is generated
/// successfully.
#[derive(Debug, Clone)]
pub struct HadronTransport<F, A, N> {
    config: TransportConfig,
    target: Nucleus,
    remnant: RemnantNucleus,
    fractions: F,
    angles: A,
    nuclear_model: N,
    probe_kinetic_energy: Option<f64>,
}

impl<F, A, N> HadronTransport<F, A, N>
where
    F: FateFractions,
    A: AngleSampler,
    N: NuclearModel,
{
    pub fn new(
        target: Nucleus,
        config: TransportConfig,
        fractions: F,
        angles: A,
        nuclear_model: N,
    ) -> Self {
        Self {
            config,
            target,
            remnant: RemnantNucleus::from_target(&target),
            fractions,
            angles,
            nuclear_model,
            probe_kinetic_energy: None,
        }
    }

    /// Bound two-body outgoing kinetic energies by the probe's kinetic energy (GeV).
    pub fn with_probe_energy(mut self, kinetic_energy: f64) -> Self {
        self.probe_kinetic_energy = Some(kinetic_energy);
        self
    }

    pub fn remnant(&self) -> &RemnantNucleus {
        &self.remnant
    }

    pub fn target(&self) -> &Nucleus {
        &self.target
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn select_fate<R: Rng + ?Sized>(&self, hadron: &Hadron, rng: &mut R) -> Fate {
        select_fate(
            hadron.species,
            hadron.kinetic_energy_mev(),
            &self.fractions,
            self.config.max_fate_iterations,
            rng,
        )
    }

    fn context(&self) -> GeneratorContext<'_, A, N> {
        GeneratorContext {
            config: &self.config,
            target: &self.target,
            angles: &self.angles,
            nuclear_model: &self.nuclear_model,
            energy_ceiling: self.probe_kinetic_energy,
        }
    }

    /// Generate a final state for `fate` against the current remnant.
    ///
    /// Nothing is committed; the returned [`FinalState`] carries the remnant
    /// as it would be afterwards.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        hadron: &Hadron,
        fate: Fate,
        rng: &mut R,
    ) -> Result<FinalState, GenerateError> {
        let ctx = self.context();
        match fate {
            Fate::Elastic => elastic::generate(&ctx, hadron, &self.remnant, rng),
            Fate::ChargeExchange | Fate::Inelastic => {
                inelastic::generate(&ctx, hadron, fate, &self.remnant, rng)
            }
            Fate::Absorption => absorption::generate(&ctx, hadron, &self.remnant, rng),
            Fate::PionProduction => pion_production::generate(&ctx, hadron, &self.remnant, rng),
            Fate::Undefined => Err(EscapeReason::UndefinedFate.into()),
        }
    }

    /// Finalize `hadron`: select a fate and generate its final state.
    ///
    /// A recoverable failure starts over with a fresh fate selection, up to
    /// `max_kinematics_attempts` times. A terminal failure, or running out of
    /// attempts, lets the hadron leave unchanged as a stable particle.
    pub fn select_and_generate<R: Rng + ?Sized>(
        &mut self,
        hadron: &Hadron,
        rng: &mut R,
    ) -> Interaction {
        let max_attempts = self.config.max_kinematics_attempts;
        let mut fate = Fate::Undefined;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            fate = self.select_fate(hadron, rng);
            debug!(species = %hadron.species, %fate, attempt, "fate selected");

            match self.generate(hadron, fate, rng) {
                Ok(final_state) => {
                    self.remnant = final_state.remnant;
                    return Interaction {
                        fate,
                        outcome: Outcome::Interacted,
                        descendants: final_state.particles,
                        attempts: attempt,
                    };
                }
                Err(GenerateError::Terminal(reason)) => {
                    debug!(species = %hadron.species, %fate, %reason, "hadron escapes");
                    return escape(hadron, fate, Outcome::Escaped(reason), attempt);
                }
                Err(GenerateError::Recoverable(err)) => {
                    debug!(
                        species = %hadron.species,
                        %fate,
                        %err,
                        attempt,
                        "kinematics failed, retrying"
                    );
                    last_error = Some(err);
                }
            }
        }

        warn!(
            species = %hadron.species,
            kinetic_energy = hadron.kinetic_energy(),
            max_attempts,
            "giving up on hadron"
        );
        escape(
            hadron,
            fate,
            Outcome::GaveUp {
                attempts: max_attempts,
                last_error,
            },
            max_attempts,
        )
    }

    /// Transport `primary` and every descendant left inside the nucleus.
    pub fn run_event<R: Rng + ?Sized>(&mut self, primary: Hadron, rng: &mut R) -> EventSummary {
        let mut record = EventRecord::new();
        let mut bank = HadronBank::new();
        let mut steps = Vec::new();

        let index = record.append_hadron(&primary, None);
        bank.push(index, primary);

        while let Some((index, hadron)) = bank.pop() {
            let interaction = self.select_and_generate(&hadron, rng);
            debug!(queued = bank.len(), "hadron finalized");
            let indices = record.append_descendants(Some(index), &interaction.descendants);
            for (particle, idx) in interaction.descendants.iter().zip(indices) {
                if particle.status == ParticleStatus::HadronInNucleus {
                    bank.push(idx, particle.to_hadron());
                }
            }
            steps.push((interaction.fate, interaction.outcome));
        }

        EventSummary {
            record,
            remnant: self.remnant,
            steps,
        }
    }
}

fn escape(hadron: &Hadron, fate: Fate, outcome: Outcome, attempts: u32) -> Interaction {
    Interaction {
        fate,
        outcome,
        descendants: vec![FinalStateParticle::stable(
            hadron.species,
            hadron.momentum,
            hadron.vertex,
        )],
        attempts,
    }
}

/// Run `events` independent cascades of `primary` on `target` in parallel.
///
/// Event `i` draws from `EventRng::for_event(seed, i)`, so results do not
/// depend on thread scheduling.
#[allow(clippy::too_many_arguments)]
pub fn simulate_events<F, A, N>(
    target: Nucleus,
    config: &TransportConfig,
    fractions: &F,
    angles: &A,
    nuclear_model: &N,
    primary: &Hadron,
    seed: u64,
    events: u64,
) -> Vec<EventSummary>
where
    F: FateFractions + Sync,
    A: AngleSampler + Sync,
    N: NuclearModel + Sync,
{
    info!(
        projectile = %primary.species,
        kinetic_energy = primary.kinetic_energy(),
        a = target.a,
        z = target.z,
        events,
        "simulating events"
    );
    let summaries: Vec<EventSummary> = (0..events)
        .into_par_iter()
        .map(|index| {
            let mut rng = EventRng::for_event(seed, index);
            let mut engine =
                HadronTransport::new(target, config.clone(), fractions, angles, nuclear_model)
                    .with_probe_energy(primary.kinetic_energy());
            engine.run_event(primary.clone(), &mut rng)
        })
        .collect();
    info!(events = summaries.len(), "simulation finished");
    summaries
}
