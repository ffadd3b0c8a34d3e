//! Match settings and tuning
//!
//! Copied into every `GameState` at setup, so a replay never depends on the
//! configuration of the machine doing the replaying.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::event::DEFAULT_EVENT_WINDOW;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Fixed ticks per second the host drives
    pub tick_rate: u32,
    /// Pause after a ball settles before the turn passes
    pub turn_delay_ms: u64,
    /// Pause between the last sink and the next hole
    pub course_delay_ms: u64,
    /// How long a bumped bouncer stays inflated
    pub deflate_window_ms: u64,

    // === Physics tuning ===
    /// Bouncer growth factor on impact
    pub bouncer_scale: f32,
    /// Outward push a bouncer gives the body that hit it
    pub bouncer_impulse: f32,
    /// Distance below the course at which a ball counts as lost
    pub out_of_bounds_margin: f32,
    /// Extra half steps run once every ball is resting
    pub settle_steps: u32,
    /// Largest accepted shot power
    pub max_power: f32,

    // === Rules ===
    /// Events kept in the log (0 keeps everything)
    pub event_window: usize,
    /// Anyone with a resting ball may shoot, turns only pace the hole
    pub mania_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            turn_delay_ms: 1000,
            course_delay_ms: 4000,
            deflate_window_ms: 1000,

            bouncer_scale: 1.25,
            bouncer_impulse: 300.0,
            out_of_bounds_margin: 100.0,
            settle_steps: 5,
            max_power: 200.0,

            event_window: DEFAULT_EVENT_WINDOW,
            mania_mode: false,
        }
    }
}

impl Settings {
    /// Milliseconds per tick
    pub fn tick_ms(&self) -> f32 {
        1000.0 / self.tick_rate.max(1) as f32
    }

    /// Parse settings, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, or defaults if it can't be read
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
