//! Level container
//!
//! Holds every entity in insertion order along with the level-wide
//! constants. The player is one of those entities; the level keeps its
//! index rather than a second owner.

use serde::{Deserialize, Serialize};

use super::entity::{Bounds, Entity, EntityKind, ObstacleKind};
use super::player::Player;
use crate::consts::*;

/// An ordered set of entities plus gravity, scroll speed and a name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    entities: Vec<Entity>,
    player_index: Option<usize>,
    /// Designated player's x when it was designated
    spawn_x: f32,
    /// Signed base gravity (negative = downward)
    pub gravity: f32,
    /// World units per second, always positive
    pub scroll_speed: f32,
    pub name: String,
}

impl Default for Level {
    fn default() -> Self {
        Self::new("Unknown", DEFAULT_GRAVITY, DEFAULT_SCROLL_SPEED)
    }
}

impl Level {
    pub fn new(name: impl Into<String>, gravity: f32, scroll_speed: f32) -> Self {
        Self {
            entities: Vec::new(),
            player_index: None,
            spawn_x: 0.0,
            gravity,
            scroll_speed,
            name: name.into(),
        }
    }

    /// Append an entity. The first player added becomes the level's player.
    /// Returns the entity's index.
    pub fn add_entity(&mut self, entity: impl Into<Entity>) -> usize {
        let index = self.entities.len();
        let entity = entity.into();
        if self.player_index.is_none() {
            if let Entity::Player(player) = &entity {
                self.player_index = Some(index);
                self.spawn_x = player.x();
            }
        }
        self.entities.push(entity);
        index
    }

    /// Designate which player entity is the player. Returns false if
    /// `index` does not refer to a player.
    pub fn set_player(&mut self, index: usize) -> bool {
        match self.entities.get(index) {
            Some(Entity::Player(player)) => {
                self.spawn_x = player.x();
                self.player_index = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn player_index(&self) -> Option<usize> {
        self.player_index
    }

    pub fn player(&self) -> Option<&Player> {
        self.player_index
            .and_then(|i| self.entities.get(i))
            .and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player_index
            .and_then(|i| self.entities.get_mut(i))
            .and_then(Entity::as_player_mut)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Split borrow: the player mutably plus every other entity in order
    pub(crate) fn player_and_others(
        &mut self,
    ) -> Option<(&mut Player, impl Iterator<Item = &Entity>)> {
        let index = self.player_index?;
        let (before, rest) = self.entities.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        let player = current.as_player_mut()?;
        let others = before.iter().chain(after.iter());
        Some((player, others))
    }

    /// Per-entity box and kind, in level order, for drawing
    pub fn drawables(&self) -> impl Iterator<Item = (EntityKind, Bounds)> + '_ {
        self.entities.iter().map(|e| (e.kind(), e.bounds()))
    }

    /// Player spawn x (0 without a player). Fixed once designated; the
    /// player moving does not change it.
    pub fn start_x(&self) -> f32 {
        self.spawn_x
    }

    /// X of the first end flag, or a fixed distance past the start
    pub fn end_x(&self) -> f32 {
        self.entities
            .iter()
            .find(|e| matches!(e, Entity::EndFlag(_)))
            .map(|e| e.bounds().x)
            .unwrap_or_else(|| self.start_x() + DEFAULT_LEVEL_LENGTH)
    }

    /// Highest solid top spanning `x`, or 0 when nothing is there
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.entities
            .iter()
            .filter_map(|e| match e {
                Entity::Obstacle(o) if o.kind() == ObstacleKind::Solid => Some(o.bounds()),
                _ => None,
            })
            .filter(|b| b.spans_x(x))
            .map(|b| b.top())
            .fold(0.0, f32::max)
    }
}
