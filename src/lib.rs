//! Cube Dash - an auto-scrolling cube runner
//!
//! Core modules:
//! - `sim`: Physics, collision and world state for one attempt
//! - `loader`: JSON level documents and the built-in fallback level
//! - `generator`: Seeded procedural level documents
//! - `settings`: Data-driven tuning
//! - `progress`: Run progress and per-level best records
//! - `session`: Attempt lifecycle (death/victory delays, restarts)

pub mod generator;
pub mod loader;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;

pub use loader::{LevelDocument, LoadError};
pub use progress::{BestRecords, progress_percent};
pub use session::{Session, SessionEvent, SessionInput, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed step used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame the session will simulate in one step
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity multiplier while rising
    pub const RISE_GRAVITY_MULTIPLIER: f32 = 2.0;
    /// Gravity multiplier while falling
    pub const FALL_GRAVITY_MULTIPLIER: f32 = 2.8;
    /// Terminal fall speed (units/s, negative = down)
    pub const MAX_FALL_SPEED: f32 = -2800.0;

    /// Player dies below this height
    pub const DEATH_Y_THRESHOLD: f32 = -100.0;
    /// Wall penetration (units) still treated as a graze
    pub const WALL_DEATH_TOLERANCE: f32 = 10.0;

    /// Level scroll speed to player horizontal velocity
    pub const SPEED_MULTIPLIER: f32 = 5.0;
    /// Upward velocity applied by a jump
    pub const DEFAULT_JUMP_FORCE: f32 = 2500.0;

    // Level defaults
    /// Base gravity when a level does not set one (negative = down)
    pub const DEFAULT_GRAVITY: f32 = -3500.0;
    /// Scroll speed when a level does not set one
    pub const DEFAULT_SCROLL_SPEED: f32 = 350.0;
    /// Assumed run length when a level has no end flag
    pub const DEFAULT_LEVEL_LENGTH: f32 = 5000.0;

    // Camera
    /// Viewport width in world units
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    /// Viewport height in world units
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
    /// Horizontal follow rate (1/s); vertical runs at half
    pub const CAMERA_SMOOTHING_RATE: f32 = 5.0;

    /// Seconds before a restart after death
    pub const RESTART_DELAY: f32 = 1.0;
    /// Seconds the victory state is held
    pub const VICTORY_DELAY: f32 = 2.0;
}
