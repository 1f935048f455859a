//! Procedural level generation
//!
//! Produces a long flat run with spikes and blocks spaced out along the
//! ground. Output is a plain [`LevelDocument`], so generated levels can be
//! saved and reloaded like hand-made ones. Same seed, same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::loader::{LevelDocument, LevelProperties, MapObject};

pub const GENERATED_LEVEL_NAME: &str = "Level 1 Extended";
pub const GENERATED_GRAVITY: f32 = -1600.0;
pub const GENERATED_SCROLL_SPEED: f32 = 350.0;

/// Ground strip
pub const GROUND_LENGTH: f32 = 16_000.0;
pub const GROUND_HEIGHT: f32 = 32.0;

/// First obstacle x, and no obstacle starts at or past this
pub const FIRST_OBSTACLE_X: u32 = 800;
pub const LAST_OBSTACLE_X: u32 = 15_000;
/// Gap between consecutive obstacles (inclusive)
pub const MIN_GAP: u32 = 400;
pub const MAX_GAP: u32 = 800;

pub const END_FLAG_X: f32 = 15_500.0;
pub const END_FLAG_HEIGHT: f32 = 1000.0;

/// Obstacle mix: below SPIKE_CHANCE a spike, below BLOCK_CHANCE a block,
/// otherwise a wide block
const SPIKE_CHANCE: f32 = 0.4;
const BLOCK_CHANCE: f32 = 0.7;

/// Build a level document from a seed
pub fn generate(seed: u64) -> LevelDocument {
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut objects = vec![
        MapObject::new("PlayerStart", 96.0, GROUND_HEIGHT, 32.0, 32.0),
        MapObject::new("Solid", 0.0, 0.0, GROUND_LENGTH, GROUND_HEIGHT),
    ];

    let mut x = FIRST_OBSTACLE_X;
    while x < LAST_OBSTACLE_X {
        let fx = x as f32;
        let roll: f32 = rng.random();
        let obstacle = if roll < SPIKE_CHANCE {
            MapObject::new("Spike", fx, GROUND_HEIGHT, 32.0, 32.0)
        } else if roll < BLOCK_CHANCE {
            MapObject::new("Solid", fx, GROUND_HEIGHT, 32.0, 64.0)
        } else {
            MapObject::new("Solid", fx, GROUND_HEIGHT, 64.0, 96.0)
        };
        objects.push(obstacle);
        x += rng.random_range(MIN_GAP..=MAX_GAP);
    }

    objects.push(MapObject::new("EndFlag", END_FLAG_X, 0.0, 32.0, END_FLAG_HEIGHT));

    log::info!(
        "Generated level from seed {}: {} objects",
        seed,
        objects.len()
    );

    LevelDocument {
        properties: LevelProperties {
            gravity: GENERATED_GRAVITY,
            scroll_speed: GENERATED_SCROLL_SPEED,
            level_name: GENERATED_LEVEL_NAME.to_string(),
            ..Default::default()
        },
        layers: Vec::new(),
        objects,
    }
}
