//! Game settings and preferences
//!
//! Loaded from an optional JSON file. Every field has a default, so a file
//! only needs the values it wants to change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;
use crate::tuning::Tuning;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; a fresh one per launch when unset
    pub seed: Option<u64>,
    /// Where the high score record lives
    pub highscore_path: PathBuf,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Stop after this many ticks (headless runs)
    pub max_ticks: Option<u64>,
    /// Pace ticks to wall-clock time instead of running flat out
    pub realtime: bool,
    /// Runs to play before quitting (restarts in between)
    pub runs: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            highscore_path: PathBuf::from("highscore.json"),
            tick_rate: TICK_RATE,
            max_ticks: None,
            realtime: true,
            runs: 1,

            master_volume: 0.8,
            sfx_volume: 0.5,
            music_volume: 0.3,
            muted: false,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a file, falling back to defaults when the file is
    /// missing or malformed
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.tick_rate = self.tick_rate.clamp(1, 1000);
        self.runs = self.runs.max(1);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.tuning = self.tuning.validated();
        self
    }

    /// Seconds per simulation tick
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
