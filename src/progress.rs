//! Run progress and best records
//!
//! Progress is how far along the level the player got, as a percentage of
//! the distance from spawn to the end flag. Best results are kept per level
//! name and persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Level;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to access records file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed records: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Percentage of `start_x..end_x` covered at `x`, clamped to 0..=100.
/// A zero or negative span yields 0.
pub fn progress_percent(start_x: f32, end_x: f32, x: f32) -> f32 {
    let span = end_x - start_x;
    if span <= 0.0 {
        return 0.0;
    }
    ((x - start_x) / span * 100.0).clamp(0.0, 100.0)
}

/// Progress of `x` through `level`
pub fn level_progress(level: &Level, x: f32) -> f32 {
    progress_percent(level.start_x(), level.end_x(), x)
}

/// Best result for one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Best progress reached (0-100)
    pub best_percent: f32,
    /// Attempts finished (deaths plus completions)
    pub attempts: u32,
}

impl LevelRecord {
    pub fn completed(&self) -> bool {
        self.best_percent >= 100.0
    }
}

/// Best records for every level played
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestRecords {
    pub levels: BTreeMap<String, LevelRecord>,
}

impl BestRecords {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Count a finished attempt. Returns whether `percent` beat the
    /// previous best for that level.
    pub fn record(&mut self, level: &str, percent: f32) -> bool {
        let entry = self.levels.entry(level.to_string()).or_default();
        entry.attempts += 1;
        if percent > entry.best_percent {
            entry.best_percent = percent;
            true
        } else {
            false
        }
    }

    pub fn get(&self, level: &str) -> Option<&LevelRecord> {
        self.levels.get(level)
    }

    pub fn best_percent(&self, level: &str) -> f32 {
        self.get(level).map(|r| r.best_percent).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ProgressError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load records, starting fresh if the file is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(records) => {
                log::info!("Loaded records for {} levels", records.levels.len());
                records
            }
            Err(e) => {
                log::warn!("{} ({}); starting fresh", e, path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProgressError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Records saved ({} levels)", self.levels.len());
        Ok(())
    }
}
