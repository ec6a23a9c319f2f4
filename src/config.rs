// Tunable parameters for the transport engine.
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`HadronTransport`](crate::HadronTransport).
///
/// Each engine owns its own copy; there is no global state. Every field has a
/// default, so a JSON file only needs to list the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Give struck nucleons a Fermi momentum drawn from the nuclear model.
    pub do_fermi: bool,
    /// Scale applied to every sampled Fermi momentum.
    pub fermi_factor: f64,
    /// Fermi-sphere radius (GeV) used by the default nuclear model.
    pub fermi_momentum: f64,
    /// Removal energy (GeV) charged for each nucleon emitted in multi-body absorption.
    pub nucleon_removal_energy: f64,
    /// Binding energy (GeV) subtracted in two-body absorption on a nucleon pair.
    pub two_body_absorption_binding: f64,
    pub max_fate_iterations: u32,
    /// Attempts per hadron before the controller gives up.
    pub max_kinematics_attempts: u32,
    /// Outer multiplicity draws in multi-body absorption.
    pub max_multiplicity_draws: u32,
    /// Inner draws for the Gaussian nucleon-sum model.
    pub max_sum_draws: u32,
    pub max_phase_space_attempts: u32,
    /// Produced pions stay in the nucleus for further transport.
    pub rescatter_produced_pions: bool,
    /// Re-draw after a failed phase-space decay instead of letting the hadron escape.
    pub retry_on_phase_space_failure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            do_fermi: true,
            fermi_factor: 1.0,
            fermi_momentum: 0.25,
            nucleon_removal_energy: 0.0,
            two_body_absorption_binding: 0.075,
            max_fate_iterations: 1000,
            max_kinematics_attempts: 100,
            max_multiplicity_draws: 10_000,
            max_sum_draws: 100,
            max_phase_space_attempts: 1000,
            rescatter_produced_pions: false,
            retry_on_phase_space_failure: false,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: TransportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let non_negative = [
            ("fermi_factor", self.fermi_factor),
            ("fermi_momentum", self.fermi_momentum),
            ("nucleon_removal_energy", self.nucleon_removal_energy),
            ("two_body_absorption_binding", self.two_body_absorption_binding),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DataError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        let limits = [
            ("max_fate_iterations", self.max_fate_iterations),
            ("max_kinematics_attempts", self.max_kinematics_attempts),
            ("max_multiplicity_draws", self.max_multiplicity_draws),
            ("max_sum_draws", self.max_sum_draws),
            ("max_phase_space_attempts", self.max_phase_space_attempts),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(DataError::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}
