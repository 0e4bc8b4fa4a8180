//! Blastline Simulation
//!
//! Timed playback of a blast sequence with live derived state.
//!
//! # Architecture
//!
//! - **Store**: Owns the session and republishes every slice on a `watch` channel
//! - **Playback**: Clock with play/pause/resume/stop/seek over the detonation timeline
//! - **Frames**: Visual state of every hole and connection at one instant
//! - **Driver**: Host tick task advancing a playing store in wall time
//! - **Export**: Snapshot of the session for persistence
//!
//! # Usage
//!
//! ```ignore
//! let mut store = SequenceStore::new(SessionContext::new("P1", "S1"), SessionConfig::default());
//! store.set_pattern_data(pattern);
//! store.set_connections(connections);
//!
//! store.play()?;
//! let store = Arc::new(Mutex::new(store));
//! spawn_playback(store.clone(), Duration::from_millis(16)).await?;
//! ```

mod config;
mod driver;
mod error;
mod export;
mod frame;
mod playback;
mod store;

pub use config::{SessionConfig, SessionContext, DEFAULT_TICK_MS};
pub use driver::{drive, spawn_playback};
pub use error::{Error, Result};
pub use export::{BlastSequenceData, DetonatorInfo, ExportMetadata, EXPORT_VERSION};
pub use frame::{
    detonation_times, generate_frame, AnimationFrame, BlastEffect, BlastEffectType,
    ConnectionVisualState, HoleVisualState, DETONATION_WINDOW_MS, EFFECT_DURATION_MS,
    EFFECT_RADIUS,
};
pub use playback::{PlaybackClock, PlaybackPhase};
pub use store::SequenceStore;

use blastline_model::{BlastConnection, PatternData};
use serde::{Deserialize, Serialize};

/// A pattern with its connections, as read from a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub pattern: PatternData,
    #[serde(default)]
    pub connections: Vec<BlastConnection>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scenario from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
