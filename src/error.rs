use thiserror::Error;

/// Failures of a single kinematic draw.
///
/// These are local to one attempt: the transport controller treats them as
/// recoverable and re-draws, up to its configured attempt ceiling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    #[error("sampled cos(theta) = {0} lies outside [-1, 1]")]
    UnphysicalAngle(f64),

    #[error("invariant mass {available:.6} GeV is below the {required:.6} GeV threshold")]
    BelowThreshold { available: f64, required: f64 },

    #[error("outgoing kinetic energy {kinetic:.6} GeV exceeds the {ceiling:.6} GeV ceiling")]
    EnergyBound { kinetic: f64, ceiling: f64 },

    #[error("phase-space decay into {products} products failed: {reason}")]
    PhaseSpace { products: usize, reason: String },

    #[error("{what} did not converge after {draws} draws")]
    SamplingNotConverged { what: &'static str, draws: u32 },
}

/// Why a hadron left the nucleus without interacting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeReason {
    #[error("no fate could be selected")]
    UndefinedFate,

    #[error("remnant has {available} usable nucleons, {required} required")]
    InsufficientNucleons { required: i32, available: i32 },

    #[error("final-state charge cannot be carried by the remnant")]
    ChargeInfeasible,

    #[error("update would leave the remnant in an invalid state")]
    InvalidRemnant,

    #[error("no acceptable nucleon multiplicity was found")]
    MultiplicityNotFound,

    #[error("fate has no final-state channel for this projectile")]
    UnsupportedChannel,

    #[error("phase-space decay failed and retries are disabled")]
    PhaseSpaceFailed,
}

/// Outcome of a failed generator call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// Retry with a fresh fate and fresh random numbers.
    #[error("recoverable: {0}")]
    Recoverable(#[from] KinematicsError),

    /// The hadron escapes unchanged; the remnant is untouched.
    #[error("terminal: {0}")]
    Terminal(EscapeReason),
}

impl From<EscapeReason> for GenerateError {
    fn from(reason: EscapeReason) -> Self {
        GenerateError::Terminal(reason)
    }
}

impl From<RemnantError> for GenerateError {
    fn from(_: RemnantError) -> Self {
        GenerateError::Terminal(EscapeReason::InvalidRemnant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemnantError {
    #[error("invalid remnant composition A={a}, Z={z}")]
    Composition { a: i32, z: i32 },

    #[error("remnant four-momentum is not finite")]
    NonFiniteMomentum,
}

/// Errors raised while loading tables and configuration.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown PDG code {0}")]
    UnknownPdg(i32),

    #[error("fraction table for {species} {fate}: {reason}")]
    InvalidTable {
        species: String,
        fate: String,
        reason: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
