use crate::angular::AngleSampler;
use crate::config::TransportConfig;
use crate::error::{EscapeReason, GenerateError, KinematicsError};
use crate::kinematics::FourMomentum;
use crate::nuclear_model::NuclearModel;
use crate::remnant::Nucleus;
use crate::species::Species;
use rand::Rng;

/// Everything a final-state generator may read but not change.
pub(crate) struct GeneratorContext<'a, A, N> {
    pub config: &'a TransportConfig,
    pub target: &'a Nucleus,
    pub angles: &'a A,
    pub nuclear_model: &'a N,
    /// Explicit kinetic-energy ceiling (GeV) for two-body outgoing particles.
    pub energy_ceiling: Option<f64>,
}

impl<'a, A: AngleSampler, N: NuclearModel> GeneratorContext<'a, A, N> {
    /// Four-momentum of a struck nucleon, with Fermi motion when enabled.
    pub fn struck_nucleon<R: Rng + ?Sized>(&self, nucleon: Species, rng: &mut R) -> FourMomentum {
        let mass = nucleon.mass();
        if self.config.do_fermi {
            let p = self.nuclear_model.sample_momentum(self.target, nucleon, rng)
                * self.config.fermi_factor;
            FourMomentum::on_shell(mass, p)
        } else {
            FourMomentum::at_rest(mass)
        }
    }

    pub fn phase_space_failure(&self, err: KinematicsError) -> GenerateError {
        if self.config.retry_on_phase_space_failure {
            GenerateError::Recoverable(err)
        } else {
            GenerateError::Terminal(EscapeReason::PhaseSpaceFailed)
        }
    }

    /// Reject outgoing particles whose kinetic energy exceeds the ceiling.
    ///
    /// Without an explicit ceiling the bound is `available`, the kinetic
    /// energy the collision can release.
    pub fn check_energy_ceiling(
        &self,
        outgoing: &[(Species, &FourMomentum)],
        available: f64,
    ) -> Result<(), KinematicsError> {
        const SLACK: f64 = 1e-9;
        let ceiling = self.energy_ceiling.unwrap_or(available);
        for (species, p) in outgoing {
            let kinetic = p.e - species.mass();
            if kinetic > ceiling + SLACK {
                return Err(KinematicsError::EnergyBound { kinetic, ceiling });
            }
        }
        Ok(())
    }
}
