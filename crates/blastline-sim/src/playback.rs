//! Playback clock for the detonation timeline.
//!
//! ```text
//!            play            pause
//!   Idle ──────────▶ Playing ──────▶ Paused
//!                     ▲  │  ◀──────   │
//!                     │  │  resume    │
//!               play  │  │ stop       │ stop
//!                     │  ▼            ▼
//!                    Stopped ◀────────┘
//! ```
//!
//! Reaching the end of the timeline while playing settles in `Paused` with
//! the time pinned at the total duration.

use std::time::Duration;

use blastline_model::SimulationState;
use serde::{Deserialize, Serialize};

/// Phase of the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No session has run yet
    #[default]
    Idle,
    /// Time advances on every tick
    Playing,
    /// Time is held
    Paused,
    /// A session ran and was reset to the beginning
    Stopped,
}

/// Simulation clock. Owns "now" for a session.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Connection delays, ascending
    delays: Vec<u32>,
    current_time: f64,
    total_duration: f64,
    phase: PlaybackPhase,
    speed: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// Create an idle clock with nothing loaded.
    pub fn new() -> Self {
        Self {
            delays: Vec::new(),
            current_time: 0.0,
            total_duration: 0.0,
            phase: PlaybackPhase::Idle,
            speed: 1.0,
        }
    }

    /// Load a timeline to play back: its length and the connection delays
    /// used for step tracking.
    pub fn load(&mut self, total_duration: u64, delays: impl IntoIterator<Item = u32>) {
        self.delays = delays.into_iter().collect();
        self.delays.sort_unstable();
        self.total_duration = total_duration as f64;
        self.current_time = self.current_time.min(self.total_duration);
    }

    /// Current simulated time in milliseconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total simulated duration in milliseconds.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Current phase.
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Whether time advances on tick.
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// Playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// One step per loaded connection.
    pub fn total_steps(&self) -> usize {
        self.delays.len()
    }

    /// Connections whose delay has been reached.
    pub fn current_step(&self) -> usize {
        self.delays
            .partition_point(|&d| f64::from(d) <= self.current_time)
    }

    /// Whether the clock sits at the end of a non-empty timeline.
    pub fn reached_end(&self) -> bool {
        self.total_duration > 0.0 && self.current_time >= self.total_duration
    }

    /// Start playing from the beginning. No-op while already playing.
    pub fn play(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        self.current_time = 0.0;
        self.phase = PlaybackPhase::Playing;
        true
    }

    /// Continue from the held time. Only from `Paused`; a clock paused at
    /// the end starts over.
    pub fn resume(&mut self) -> bool {
        if self.phase != PlaybackPhase::Paused {
            return false;
        }
        if self.reached_end() {
            self.current_time = 0.0;
        }
        self.phase = PlaybackPhase::Playing;
        true
    }

    /// Hold the current time. Only from `Playing`.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.phase = PlaybackPhase::Paused;
        true
    }

    /// Halt and return to the beginning. Only from `Playing` or `Paused`.
    pub fn stop(&mut self) -> bool {
        if !matches!(self.phase, PlaybackPhase::Playing | PlaybackPhase::Paused) {
            return false;
        }
        self.current_time = 0.0;
        self.phase = PlaybackPhase::Stopped;
        true
    }

    /// Jump to `time`, clamped into `[0, total_duration]`. Legal in any
    /// phase; the phase is unchanged.
    pub fn seek(&mut self, time: f64) -> f64 {
        self.current_time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.total_duration)
        };
        self.current_time
    }

    /// Jump to the delay of the `step`-th connection in time order.
    pub fn seek_to_step(&mut self, step: usize) -> Option<f64> {
        let delay = *self.delays.get(step)?;
        Some(self.seek(f64::from(delay)))
    }

    /// Set the speed multiplier. Rejects non-finite and non-positive values.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            return false;
        }
        self.speed = speed;
        true
    }

    /// Advance by `wall` elapsed wall time scaled by the speed.
    ///
    /// Returns the new time, or `None` when not playing. Time never moves
    /// backwards and never passes the total duration; reaching it pauses.
    pub fn advance(&mut self, wall: Duration) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        let step = wall.as_secs_f64() * 1000.0 * self.speed;
        self.current_time = (self.current_time + step).min(self.total_duration);
        if self.current_time >= self.total_duration {
            self.phase = PlaybackPhase::Paused;
        }
        Some(self.current_time)
    }

    /// Calculate progress as a fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.total_duration <= 0.0 {
            0.0
        } else {
            self.current_time / self.total_duration
        }
    }
}

impl From<&PlaybackClock> for SimulationState {
    fn from(clock: &PlaybackClock) -> Self {
        Self {
            is_playing: clock.phase == PlaybackPhase::Playing,
            is_paused: clock.phase == PlaybackPhase::Paused,
            current_time: clock.current_time,
            total_duration: clock.total_duration,
            playback_speed: clock.speed,
            current_step: clock.current_step(),
            total_steps: clock.total_steps(),
        }
    }
}
