//! Runner simulation module
//!
//! All gameplay logic lives here. This module is pure and deterministic:
//! - Caller-supplied timestep, no clocks
//! - Stable iteration order (level insertion order)
//! - No rendering, audio or file dependencies

pub mod collision;
pub mod controller;
pub mod entity;
pub mod level;
pub mod player;
pub mod world;

pub use collision::{Overlap, SolidContact, resolve_solid};
pub use controller::{CameraFollow, CameraSettings, RunController};
pub use entity::{
    Body, Bounds, DynamicBody, EndFlag, Entity, EntityKind, Obstacle, ObstacleKind,
};
pub use level::Level;
pub use player::{GravityFeel, Player, PlayerEvent};
pub use world::{DeathCause, GameWorld, WorldRules, WorldState};
