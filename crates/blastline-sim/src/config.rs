//! Session configuration and context.

use std::time::Duration;

use blastline_sequence::ValidationOptions;

use crate::{Error, Result};

/// Default host tick period (about 60 frames per second).
pub const DEFAULT_TICK_MS: u64 = 16;

/// Tunables of a playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Period of the host tick task
    pub tick_interval: Duration,
    /// Playback speed a new session starts with
    pub initial_speed: f64,
    pub validation: ValidationOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            initial_speed: 1.0,
            validation: ValidationOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables, falling back to defaults
    /// for unset ones.
    ///
    /// - `BLASTLINE_TICK_MS`: tick period in milliseconds (> 0)
    /// - `BLASTLINE_SPEED`: initial playback speed (finite, > 0)
    /// - `BLASTLINE_STRICT_VALIDATION`: `true`/`false`/`1`/`0`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("BLASTLINE_TICK_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid BLASTLINE_TICK_MS: {}", raw)))?;
            if ms == 0 {
                return Err(Error::Config("BLASTLINE_TICK_MS must be positive".into()));
            }
            config.tick_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("BLASTLINE_SPEED") {
            let speed: f64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid BLASTLINE_SPEED: {}", raw)))?;
            if !(speed.is_finite() && speed > 0.0) {
                return Err(Error::InvalidSpeed(speed));
            }
            config.initial_speed = speed;
        }

        if let Some(raw) = lookup("BLASTLINE_STRICT_VALIDATION") {
            let strict = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(Error::Config(format!(
                        "invalid BLASTLINE_STRICT_VALIDATION: {}",
                        raw
                    )))
                }
            };
            config.validation = ValidationOptions { strict };
        }

        Ok(config)
    }
}

/// Identity of the project a session belongs to. Stamped on exports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    pub project_id: String,
    pub site_id: String,
    pub project_name: Option<String>,
}

impl SessionContext {
    pub fn new(project_id: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            site_id: site_id.into(),
            project_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}
