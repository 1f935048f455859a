//! Level documents
//!
//! A level on disk is a JSON document shaped like a Tiled map export: a
//! property block, character-grid tile layers and a list of placed objects.
//! Rows are written top-to-bottom; the world is Y-up with the origin at the
//! bottom-left, so the loader flips them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{EndFlag, Level, Obstacle, Player};

/// Tile edge length used when a document leaves it out
pub const DEFAULT_TILE_SIZE: f32 = 32.0;
/// Spike tiles are shrunk to this fraction of a tile before hitbox shrinking
pub const SPIKE_TILE_SCALE: f32 = 0.6;
/// Player synthesized when a level has no spawn
pub const SPAWN_X: f32 = 256.0;
pub const SPAWN_SIZE: f32 = 180.0;
pub const SPAWN_CLEARANCE: f32 = 10.0;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Invalid(String),
}

/// Map-wide properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelProperties {
    pub gravity: f32,
    pub scroll_speed: f32,
    pub level_name: String,
    pub tile_width: f32,
    pub tile_height: f32,
}

impl Default for LevelProperties {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            level_name: "Unknown".to_string(),
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
        }
    }
}

/// What a tile layer's filled cells turn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Solid,
    Spike,
    Goal,
    /// Decoration; cells are skipped
    Ignored,
}

/// A grid of cells; any character other than space or `.` is filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub kill: bool,
    #[serde(default)]
    pub ground: bool,
    /// Top row first
    #[serde(default)]
    pub rows: Vec<String>,
}

impl TileLayer {
    pub fn role(&self) -> LayerRole {
        let name = self.name.to_lowercase();
        if name.contains("ground") || name.contains("solid") || self.ground {
            return LayerRole::Solid;
        }
        if name.contains("obstacle") || name.contains("spike") || self.kill {
            return LayerRole::Spike;
        }
        if ["endflag", "flag", "finish", "end"]
            .iter()
            .any(|key| name.contains(key))
        {
            return LayerRole::Goal;
        }

        let class = self.class.as_deref().unwrap_or(&self.name);
        if class.eq_ignore_ascii_case("solid") {
            LayerRole::Solid
        } else if class.eq_ignore_ascii_case("obstacle") {
            LayerRole::Spike
        } else if class.eq_ignore_ascii_case("endflag") {
            LayerRole::Goal
        } else {
            LayerRole::Ignored
        }
    }

    /// Filled cells as (column, row-from-bottom), column-major, bottom-up
    pub fn filled_cells(&self) -> Vec<(usize, usize)> {
        let height = self.rows.len();
        let grid: Vec<Vec<char>> = self.rows.iter().map(|r| r.chars().collect()).collect();
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);

        let mut cells = Vec::new();
        for col in 0..width {
            for from_bottom in 0..height {
                let row = &grid[height - 1 - from_bottom];
                if let Some(&c) = row.get(col) {
                    if c != ' ' && c != '.' {
                        cells.push((col, from_bottom));
                    }
                }
            }
        }
        cells
    }
}

/// A placed object in world units (already Y-up)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_object_size")]
    pub width: f32,
    #[serde(default = "default_object_size")]
    pub height: f32,
}

fn default_object_size() -> f32 {
    DEFAULT_TILE_SIZE
}

impl MapObject {
    pub fn new(kind: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            width,
            height,
        }
    }
}

/// Serialized level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDocument {
    pub properties: LevelProperties,
    pub layers: Vec<TileLayer>,
    pub objects: Vec<MapObject>,
}

impl LevelDocument {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Instantiate a fresh level. Tile layers win; objects are only read
    /// when no layer produced anything. A spawn is synthesized if missing.
    pub fn build(&self) -> Level {
        let props = &self.properties;
        let mut level = Level::new(props.level_name.clone(), props.gravity, props.scroll_speed);

        if !self.build_tile_layers(&mut level) {
            self.build_objects(&mut level);
        }

        if level.player().is_none() {
            let y = level.ground_height_at(SPAWN_X) + SPAWN_CLEARANCE;
            log::warn!("Level '{}' has no spawn, placing player at ({}, {})", level.name, SPAWN_X, y);
            level.add_entity(Player::new(SPAWN_X, y, SPAWN_SIZE, SPAWN_SIZE));
        }

        log::info!(
            "Level '{}' built: {} entities",
            level.name,
            level.entities().len()
        );
        level
    }

    fn build_tile_layers(&self, level: &mut Level) -> bool {
        let tw = self.properties.tile_width;
        let th = self.properties.tile_height;
        let mut found = false;

        for layer in &self.layers {
            let role = layer.role();
            if role == LayerRole::Ignored {
                continue;
            }
            for (col, row) in layer.filled_cells() {
                let x = col as f32 * tw;
                let y = row as f32 * th;
                match role {
                    LayerRole::Solid => {
                        level.add_entity(Obstacle::solid(x, y, tw, th));
                    }
                    LayerRole::Spike => {
                        let w = tw * SPIKE_TILE_SCALE;
                        let h = th * SPIKE_TILE_SCALE;
                        level.add_entity(Obstacle::spike(x + (tw - w) / 2.0, y, w, h));
                    }
                    LayerRole::Goal => {
                        level.add_entity(EndFlag::new(x, y, tw, th));
                    }
                    LayerRole::Ignored => continue,
                }
                found = true;
            }
        }
        found
    }

    fn build_objects(&self, level: &mut Level) {
        for obj in &self.objects {
            let (x, y, w, h) = (obj.x, obj.y, obj.width, obj.height);
            match obj.kind.as_str() {
                "PlayerStart" | "spawn" => {
                    // The last spawn in the list is the one used
                    let index = level.add_entity(Player::new(x, y, w, h));
                    level.set_player(index);
                }
                "Spike" | "kill" => {
                    level.add_entity(Obstacle::spike(x, y, w, h));
                }
                "Solid" => {
                    level.add_entity(Obstacle::solid(x, y, w, h));
                }
                "EndFlag" | "finish" => {
                    level.add_entity(EndFlag::new(x, y, w, h));
                }
                other => log::debug!("Skipping unknown object type '{}'", other),
            }
        }
    }
}

/// Gravity must pull down and the level must scroll forward
pub fn validate(level: &Level) -> Result<(), LoadError> {
    if level.gravity >= 0.0 {
        return Err(LoadError::Invalid(format!(
            "gravity must be negative, got {}",
            level.gravity
        )));
    }
    if level.scroll_speed <= 0.0 {
        return Err(LoadError::Invalid(format!(
            "scroll speed must be positive, got {}",
            level.scroll_speed
        )));
    }
    Ok(())
}

/// Read, build and validate a level file
pub fn load(path: impl AsRef<Path>) -> Result<Level, LoadError> {
    let level = LevelDocument::read(path)?.build();
    validate(&level)?;
    Ok(level)
}

/// Like [`load`], but any failure yields the built-in fallback level
pub fn load_or_fallback(path: impl AsRef<Path>) -> Level {
    LevelSource::from_path(path).build()
}

/// Small hand-made level used whenever a document cannot be used
pub fn fallback_level() -> Level {
    let mut level = Level::new("Fallback", -1500.0, 150.0);
    level.add_entity(Player::new(100.0, 114.0, 64.0, 64.0));
    level.add_entity(Obstacle::solid(0.0, 0.0, 10_000.0, 50.0));
    level.add_entity(Obstacle::spike(500.0, 50.0, 32.0, 32.0));
    level.add_entity(Obstacle::solid(700.0, 50.0, 100.0, 50.0));
    level.add_entity(EndFlag::new(1500.0, 50.0, 32.0, 100.0));
    level
}

/// Where attempts get their level from. Each attempt builds a fresh copy.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSource {
    /// A document already known to build a valid level
    Document(LevelDocument),
    Fallback,
}

impl LevelSource {
    /// Use `doc` if it builds a valid level, else the fallback
    pub fn from_document(doc: LevelDocument) -> Self {
        match validate(&doc.build()) {
            Ok(()) => LevelSource::Document(doc),
            Err(e) => {
                log::warn!("{}; using fallback level", e);
                LevelSource::Fallback
            }
        }
    }

    /// Never fails: missing, corrupt or invalid files give the fallback
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match LevelDocument::read(path) {
            Ok(doc) => Self::from_document(doc),
            Err(e) => {
                log::warn!("Could not load {}: {}; using fallback level", path.display(), e);
                LevelSource::Fallback
            }
        }
    }

    pub fn build(&self) -> Level {
        match self {
            LevelSource::Document(doc) => doc.build(),
            LevelSource::Fallback => fallback_level(),
        }
    }
}
