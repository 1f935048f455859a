//! Auto-scroll and camera follow
//!
//! The player never accelerates horizontally on its own; every frame the
//! controller pins its horizontal speed to the level's scroll speed, then
//! lets the world update and eases a camera point toward the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::GameWorld;
use crate::consts::*;

/// Viewport size and follow speed for the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal smoothing rate (1/s); vertical runs at half this
    pub smoothing_rate: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            smoothing_rate: CAMERA_SMOOTHING_RATE,
        }
    }
}

/// Camera center that lags behind the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFollow {
    pub settings: CameraSettings,
    /// Current camera center in world space
    pub position: Vec2,
}

impl CameraFollow {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            position: Vec2::new(settings.viewport_width / 2.0, settings.viewport_height / 2.0),
        }
    }

    /// Start already centred on a target (no easing on the first frame)
    pub fn centred_on(settings: CameraSettings, player_pos: Vec2) -> Self {
        let mut camera = Self::new(settings);
        camera.position = camera.target(player_pos);
        camera
    }

    /// Where the camera wants to be: player in the left third, and never
    /// lower than half a viewport above the origin
    pub fn target(&self, player_pos: Vec2) -> Vec2 {
        let w = self.settings.viewport_width;
        let h = self.settings.viewport_height;
        Vec2::new(
            player_pos.x + w / 3.0,
            (h / 2.0).max(player_pos.y + h / 4.0),
        )
    }

    /// Exponentially ease toward the target; vertical at half rate
    pub fn step(&mut self, player_pos: Vec2, dt: f32) {
        let target = self.target(player_pos);
        let rate = self.settings.smoothing_rate;
        let alpha_x = (rate * dt).min(1.0);
        let alpha_y = (rate * 0.5 * dt).min(1.0);
        self.position.x += (target.x - self.position.x) * alpha_x;
        self.position.y += (target.y - self.position.y) * alpha_y;
    }
}

/// Drives the auto-run and the camera around a [`GameWorld`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunController {
    /// Scroll speed to horizontal velocity factor
    pub speed_multiplier: f32,
    pub camera: CameraFollow,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new(SPEED_MULTIPLIER, CameraSettings::default())
    }
}

impl RunController {
    pub fn new(speed_multiplier: f32, camera: CameraSettings) -> Self {
        Self {
            speed_multiplier,
            camera: CameraFollow::new(camera),
        }
    }

    /// Build a controller whose camera starts on the world's player
    pub fn for_world(world: &GameWorld, speed_multiplier: f32, camera: CameraSettings) -> Self {
        let camera = match world.player() {
            Some(player) => CameraFollow::centred_on(camera, Vec2::new(player.x(), player.y())),
            None => CameraFollow::new(camera),
        };
        Self {
            speed_multiplier,
            camera,
        }
    }

    /// Horizontal velocity forced onto a living player
    pub fn run_speed(&self, world: &GameWorld) -> f32 {
        world.level().scroll_speed * self.speed_multiplier
    }

    /// Force the run speed, update the world, then follow with the camera
    pub fn update(&mut self, world: &mut GameWorld, dt: f32) {
        let run_speed = self.run_speed(world);
        if let Some(player) = world.player_mut() {
            if player.is_alive() {
                let vy = player.vy();
                player.set_velocity(run_speed, vy);
            }
        }

        world.update(dt);

        if let Some(player) = world.player() {
            self.camera.step(Vec2::new(player.x(), player.y()), dt);
        }
    }

    /// Current camera center
    pub fn camera_position(&self) -> Vec2 {
        self.camera.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Obstacle;
    use crate::sim::level::Level;
    use crate::sim::player::Player;

    const DT: f32 = 1.0 / 60.0;

    fn running_world() -> GameWorld {
        let mut level = Level::new("Test", -1000.0, 350.0);
        level.add_entity(Obstacle::solid(0.0, 0.0, 100_000.0, 100.0));
        level.add_entity(Player::new(100.0, 100.0, 32.0, 32.0));
        GameWorld::new(level)
    }

    #[test]
    fn test_forces_horizontal_speed() {
        let mut world = running_world();
        let mut controller = RunController::default();
        controller.update(&mut world, DT);

        let player = world.player().expect("player");
        assert!((player.vx() - 350.0 * SPEED_MULTIPLIER).abs() < 0.001);
        assert!((player.x() - (100.0 + 1750.0 * DT)).abs() < 0.01);
    }

    #[test]
    fn test_leaves_vertical_speed_alone() {
        let mut world = running_world();
        world.player_mut().expect("player").set_vy(800.0);
        let mut controller = RunController::default();
        controller.update(&mut world, DT);

        // Only gravity touched vy: 800 - 1000 * 2.0 / 60
        let player = world.player().expect("player");
        assert!((player.vy() - (800.0 - 2000.0 * DT)).abs() < 0.01);
    }

    #[test]
    fn test_dead_player_not_driven() {
        let mut world = running_world();
        world.player_mut().expect("player").kill();
        let mut controller = RunController::default();
        controller.update(&mut world, DT);
        assert_eq!(world.player().expect("player").vx(), 0.0);
        assert_eq!(world.player().expect("player").x(), 100.0);
    }

    #[test]
    fn test_camera_target() {
        let camera = CameraFollow::new(CameraSettings::default());
        let low = camera.target(Vec2::new(300.0, 0.0));
        assert!((low.x - (300.0 + 1280.0 / 3.0)).abs() < 0.001);
        assert_eq!(low.y, 360.0);

        let high = camera.target(Vec2::new(0.0, 1000.0));
        assert_eq!(high.y, 1000.0 + 180.0);
    }

    #[test]
    fn test_camera_vertical_lags_horizontal() {
        let mut camera = CameraFollow::new(CameraSettings::default());
        camera.position = Vec2::ZERO;
        let player = Vec2::new(1000.0, 2000.0);
        let target = camera.target(player);

        camera.step(player, 0.1);
        let frac_x = camera.position.x / target.x;
        let frac_y = camera.position.y / target.y;
        assert!((frac_x - 0.5).abs() < 0.001);
        assert!((frac_y - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_camera_snaps_with_large_step() {
        let mut camera = CameraFollow::new(CameraSettings::default());
        let player = Vec2::new(5000.0, 800.0);
        camera.step(player, 10.0);
        let target = camera.target(player);
        assert!((camera.position - target).length() < 0.01);
    }

    #[test]
    fn test_controller_camera_tracks_run() {
        let mut world = running_world();
        let mut controller =
            RunController::for_world(&world, SPEED_MULTIPLIER, CameraSettings::default());
        let start = controller.camera_position();
        for _ in 0..60 {
            controller.update(&mut world, DT);
        }
        assert!(controller.camera_position().x > start.x);
        assert_eq!(controller.camera_position().y, 360.0);
    }

    #[test]
    fn test_no_player_is_safe() {
        let mut world = GameWorld::new(Level::default());
        let mut controller = RunController::default();
        controller.update(&mut world, DT);
        assert!(world.is_running());
    }
}
