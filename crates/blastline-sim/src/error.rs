//! Error types for blastline-sim.

use blastline_model::SettingsOutOfRange;
use thiserror::Error;

/// Result type for blastline-sim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the session store and its collaborators.
///
/// Structural defects in the data (dangling hole references, missing
/// endpoints) are reported through validation, never through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation needs a drill pattern and none is loaded.
    #[error("no drill pattern loaded")]
    NoPattern,

    /// Playback needs at least one connection.
    #[error("no connections to simulate")]
    NoConnections,

    /// Playback speed must be finite and positive.
    #[error("invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Simulation settings out of range.
    #[error("invalid simulation settings: {field} = {value} (max {max})")]
    InvalidSettings {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Step index past the end of the sequence.
    #[error("step {step} out of range (sequence has {total} steps)")]
    StepOutOfRange { step: usize, total: usize },

    /// Malformed configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SettingsOutOfRange> for Error {
    fn from(err: SettingsOutOfRange) -> Self {
        Error::InvalidSettings {
            field: err.field,
            value: err.value,
            max: err.max,
        }
    }
}
