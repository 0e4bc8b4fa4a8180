//! Playback state and display settings of a simulation session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound of [`SimulationSettings::effect_intensity`].
pub const MAX_EFFECT_INTENSITY: u8 = 100;

/// Live playback state. One instance per editing session, mutated only by
/// the playback clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub is_playing: bool,
    pub is_paused: bool,
    /// Simulated time in milliseconds, within `[0, total_duration]`
    pub current_time: f64,
    /// Length of the simulation in milliseconds
    pub total_duration: f64,
    /// Playback speed multiplier, always positive
    pub playback_speed: f64,
    pub current_step: usize,
    pub total_steps: usize,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_paused: false,
            current_time: 0.0,
            total_duration: 0.0,
            playback_speed: 1.0,
            current_step: 0,
            total_steps: 0,
        }
    }
}

/// Rendering detail tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationQuality {
    Low,
    #[default]
    Medium,
    High,
}

/// Display toggles for the simulation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSettings {
    pub show_timing: bool,
    pub show_connections: bool,
    pub show_effects: bool,
    pub show_sequence_numbers: bool,
    /// 0 - 100
    pub effect_intensity: u8,
    pub animation_quality: AnimationQuality,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            show_timing: true,
            show_connections: true,
            show_effects: true,
            show_sequence_numbers: true,
            effect_intensity: 75,
            animation_quality: AnimationQuality::Medium,
        }
    }
}

/// A settings field outside its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} = {value} exceeds {max}")]
pub struct SettingsOutOfRange {
    pub field: &'static str,
    pub value: u32,
    pub max: u32,
}

impl SimulationSettings {
    /// Range-check the settings, reporting the first offending field.
    pub fn check(&self) -> Result<(), SettingsOutOfRange> {
        if self.effect_intensity > MAX_EFFECT_INTENSITY {
            return Err(SettingsOutOfRange {
                field: "effectIntensity",
                value: u32::from(self.effect_intensity),
                max: u32::from(MAX_EFFECT_INTENSITY),
            });
        }
        Ok(())
    }
}
