//! Game settings and tuning
//!
//! Everything a player or designer might want to tweak without touching the
//! physics code. Stored as JSON; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{CameraSettings, GravityFeel, WorldRules};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Input ===
    /// Upward velocity applied when a jump is accepted
    pub jump_force: f32,

    // === Movement ===
    /// Level scroll speed to player run speed
    pub speed_multiplier: f32,
    /// Asymmetric gravity and terminal velocity
    pub feel: GravityFeel,

    // === Rules ===
    /// Height below which the player dies
    pub death_y: f32,
    /// Wall penetration tolerated before a wall death
    pub wall_tolerance: f32,

    // === Camera ===
    pub camera: CameraSettings,

    // === Pacing (seconds) ===
    pub restart_delay: f32,
    pub victory_delay: f32,
    /// Longest frame simulated in one step
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jump_force: DEFAULT_JUMP_FORCE,

            speed_multiplier: SPEED_MULTIPLIER,
            feel: GravityFeel::default(),

            death_y: DEATH_Y_THRESHOLD,
            wall_tolerance: WALL_DEATH_TOLERANCE,

            camera: CameraSettings::default(),

            restart_delay: RESTART_DELAY,
            victory_delay: VICTORY_DELAY,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Death threshold and wall tolerance for a [`crate::sim::GameWorld`]
    pub fn world_rules(&self) -> WorldRules {
        WorldRules {
            death_y: self.death_y,
            wall_tolerance: self.wall_tolerance,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.feel.fall_multiplier <= self.feel.rise_multiplier {
            return Err(SettingsError::Invalid(format!(
                "fall multiplier {} must exceed rise multiplier {}",
                self.feel.fall_multiplier, self.feel.rise_multiplier
            )));
        }
        if self.feel.max_fall_speed >= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "max fall speed must be negative, got {}",
                self.feel.max_fall_speed
            )));
        }
        if self.camera.smoothing_rate <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "camera smoothing rate must be positive, got {}",
                self.camera.smoothing_rate
            )));
        }
        Ok(())
    }

    /// Read and validate a settings file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} ({}); using default settings", e, path.display());
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
