//! Entity model
//!
//! Every entity is an axis-aligned box whose position is its bottom-left
//! corner (Y points up). Kinds are a tagged enum dispatched with `match`
//! rather than a type hierarchy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;

/// Axis-aligned bounding box, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    /// Whether `x` lies within `[left, right)`
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x < self.right()
    }
}

/// Static geometry shared by every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// A body that moves under physics integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicBody {
    pub body: Body,
    pub vel: Vec2,
}

impl DynamicBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            body: Body::new(x, y, width, height),
            vel: Vec2::ZERO,
        }
    }

    /// Apply vertical acceleration for one step
    #[inline]
    pub fn accelerate(&mut self, dt: f32, gravity: f32) {
        self.vel.y += gravity * dt;
    }

    /// Move by the current velocity (forward Euler, no sub-stepping)
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.body.pos += self.vel * dt;
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }
}

/// Obstacle behaviour, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Can be stood on, hit from below, or run into
    Solid,
    /// Any overlap kills the player
    Killer,
}

/// An immutable obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    body: Body,
    kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: ObstacleKind) -> Self {
        Self {
            body: Body::new(x, y, width, height),
            kind,
        }
    }

    pub fn solid(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, width, height, ObstacleKind::Solid)
    }

    /// Spike with a hitbox shrunk toward the triangle's tip: 35% of the
    /// width, centred, and the band from 30% to 80% of the height.
    pub fn spike(x: f32, y: f32, width: f32, height: f32) -> Self {
        let hit_w = width * 0.35;
        let hit_h = height * 0.5;
        let hit_x = x + (width - hit_w) / 2.0;
        let hit_y = y + height * 0.3;
        Self::new(hit_x, hit_y, hit_w, hit_h, ObstacleKind::Killer)
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }
}

/// Goal marker; overlapping it completes the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndFlag {
    body: Body,
}

impl EndFlag {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            body: Body::new(x, y, width, height),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }
}

/// Discriminant handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Solid,
    Killer,
    Goal,
}

/// Any entity a level can hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Player(Player),
    Obstacle(Obstacle),
    EndFlag(EndFlag),
}

impl Entity {
    pub fn bounds(&self) -> Bounds {
        match self {
            Entity::Player(player) => player.bounds(),
            Entity::Obstacle(obstacle) => obstacle.bounds(),
            Entity::EndFlag(flag) => flag.bounds(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Obstacle(obstacle) => match obstacle.kind() {
                ObstacleKind::Solid => EntityKind::Solid,
                ObstacleKind::Killer => EntityKind::Killer,
            },
            Entity::EndFlag(_) => EntityKind::Goal,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }
}

impl From<Player> for Entity {
    fn from(player: Player) -> Self {
        Entity::Player(player)
    }
}

impl From<Obstacle> for Entity {
    fn from(obstacle: Obstacle) -> Self {
        Entity::Obstacle(obstacle)
    }
}

impl From<EndFlag> for Entity {
    fn from(flag: EndFlag) -> Self {
        Entity::EndFlag(flag)
    }
}
