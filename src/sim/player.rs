//! Player physics
//!
//! Velocity integration with asymmetric gravity: the cube rises under a
//! lighter pull than it falls, which gives the snappy arc the genre is
//! known for.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Bounds, DynamicBody};
use crate::consts::*;

/// Gravity shaping applied on top of a level's base gravity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityFeel {
    /// Gravity multiplier while moving up
    pub rise_multiplier: f32,
    /// Gravity multiplier while moving down (larger than rise)
    pub fall_multiplier: f32,
    /// Terminal fall speed (negative)
    pub max_fall_speed: f32,
}

impl Default for GravityFeel {
    fn default() -> Self {
        Self {
            rise_multiplier: RISE_GRAVITY_MULTIPLIER,
            fall_multiplier: FALL_GRAVITY_MULTIPLIER,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

impl GravityFeel {
    /// Base gravity scaled for the current direction of travel
    #[inline]
    pub fn effective_gravity(&self, base_gravity: f32, vy: f32) -> f32 {
        if vy > 0.0 {
            base_gravity * self.rise_multiplier
        } else if vy < 0.0 {
            base_gravity * self.fall_multiplier
        } else {
            base_gravity
        }
    }
}

/// Notifications produced by the player for outer layers (audio etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// A jump request succeeded
    Jumped,
}

/// The player-controlled cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    motion: DynamicBody,
    alive: bool,
    on_ground: bool,
    feel: GravityFeel,
    /// Pending notifications, drained by the frame loop
    #[serde(skip)]
    events: Vec<PlayerEvent>,
}

impl Player {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            motion: DynamicBody::new(x, y, width, height),
            alive: true,
            on_ground: false,
            feel: GravityFeel::default(),
            events: Vec::new(),
        }
    }

    /// Replace the gravity shaping (builder style)
    pub fn with_feel(mut self, feel: GravityFeel) -> Self {
        self.feel = feel;
        self
    }

    pub fn set_feel(&mut self, feel: GravityFeel) {
        self.feel = feel;
    }

    pub fn feel(&self) -> &GravityFeel {
        &self.feel
    }

    /// Advance one frame: shaped gravity, terminal-speed clamp, then move
    pub fn update_physics(&mut self, dt: f32, base_gravity: f32) {
        let gravity = self.feel.effective_gravity(base_gravity, self.motion.vel.y);
        self.motion.accelerate(dt, gravity);
        self.motion.vel.y = self.motion.vel.y.max(self.feel.max_fall_speed);
        self.motion.advance(dt);
    }

    /// Jump if grounded and alive. Returns whether the jump happened;
    /// airborne or dead requests are silently ignored.
    pub fn jump(&mut self, force: f32) -> bool {
        if !(self.on_ground && self.alive) {
            return false;
        }
        self.motion.vel.y = force;
        self.on_ground = false;
        self.events.push(PlayerEvent::Jumped);
        log::debug!("Jump at x={:.1} (vy={})", self.motion.body.pos.x, force);
        true
    }

    /// Setting ground state to true always zeroes vertical velocity
    pub fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
        if on_ground {
            self.motion.vel.y = 0.0;
        }
    }

    /// Idempotent; a dead player keeps its box but stops moving
    pub fn kill(&mut self) {
        self.alive = false;
        self.motion.vel = Vec2::ZERO;
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn bounds(&self) -> Bounds {
        self.motion.bounds()
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.motion.body.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.motion.body.pos.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.motion.body.pos.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.motion.body.pos.y = y;
    }

    pub fn height(&self) -> f32 {
        self.motion.body.size.y
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion.vel
    }

    pub fn vx(&self) -> f32 {
        self.motion.vel.x
    }

    pub fn vy(&self) -> f32 {
        self.motion.vel.y
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.motion.vel = Vec2::new(vx, vy);
    }

    pub fn set_vy(&mut self, vy: f32) {
        self.motion.vel.y = vy;
    }
}
