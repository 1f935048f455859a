//! Attempt lifecycle
//!
//! A session plays one level over and over: each attempt gets a freshly
//! built world. Death holds the result on screen for a moment and restarts;
//! completion holds a little longer and then ends the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::loader::LevelSource;
use crate::progress::{BestRecords, level_progress};
use crate::settings::Settings;
use crate::sim::{DeathCause, GameWorld, PlayerEvent, RunController, WorldState};

/// Input sampled by the host each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInput {
    /// Jump button currently held; only the press edge jumps
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Seconds spent showing the death so far
    Dying { timer: f32 },
    /// Seconds spent showing the victory so far
    Victory { timer: f32 },
    Finished,
}

/// Things the host may want to react to (sound, UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Jump,
    Died { cause: DeathCause, percent: f32 },
    Completed,
    Restarted { attempt: u32 },
}

/// Snapshot for a heads-up display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub level_name: String,
    pub gravity: f32,
    pub scroll_speed: f32,
    pub percent: f32,
    pub best_percent: f32,
    pub attempt: u32,
    pub dead: bool,
    pub completed: bool,
}

pub struct Session {
    source: LevelSource,
    settings: Settings,
    world: GameWorld,
    controller: RunController,
    attempt: u32,
    phase: SessionPhase,
    records: BestRecords,
    jump_held: bool,
}

impl Session {
    pub fn new(source: LevelSource, settings: Settings) -> Self {
        let (world, controller) = build_attempt(&source, &settings);
        log::info!("Session started on '{}'", world.level().name);
        Self {
            source,
            settings,
            world,
            controller,
            attempt: 1,
            phase: SessionPhase::Playing,
            records: BestRecords::new(),
            jump_held: false,
        }
    }

    /// Start from previously saved records (builder style)
    pub fn with_records(mut self, records: BestRecords) -> Self {
        self.records = records;
        self
    }

    /// Advance by one host frame
    pub fn frame(&mut self, input: SessionInput, dt: f32) -> Vec<SessionEvent> {
        let dt = dt.clamp(0.0, self.settings.max_frame_dt);
        let jump_pressed = input.jump && !self.jump_held;
        self.jump_held = input.jump;

        let mut events = Vec::new();
        match self.phase {
            SessionPhase::Playing => self.play(jump_pressed, dt, &mut events),
            SessionPhase::Dying { timer } => {
                let timer = timer + dt;
                if timer >= self.settings.restart_delay {
                    self.restart();
                    events.push(SessionEvent::Restarted {
                        attempt: self.attempt,
                    });
                } else {
                    self.phase = SessionPhase::Dying { timer };
                }
            }
            SessionPhase::Victory { timer } => {
                let timer = timer + dt;
                self.phase = if timer >= self.settings.victory_delay {
                    log::info!("Session finished after {} attempts", self.attempt);
                    SessionPhase::Finished
                } else {
                    SessionPhase::Victory { timer }
                };
            }
            SessionPhase::Finished => {}
        }
        events
    }

    fn play(&mut self, jump_pressed: bool, dt: f32, events: &mut Vec<SessionEvent>) {
        if jump_pressed {
            if let Some(player) = self.world.player_mut() {
                player.jump(self.settings.jump_force);
            }
        }

        self.controller.update(&mut self.world, dt);

        events.extend(self.world.drain_events().into_iter().map(|event| match event {
            PlayerEvent::Jumped => SessionEvent::Jump,
        }));

        match self.world.state() {
            WorldState::Running => {}
            WorldState::PlayerDead(cause) => {
                let percent = self.percent();
                self.record(percent);
                log::info!(
                    "Attempt {} died ({:?}) at {:.0}%",
                    self.attempt,
                    cause,
                    percent
                );
                events.push(SessionEvent::Died { cause, percent });
                self.phase = SessionPhase::Dying { timer: 0.0 };
            }
            WorldState::LevelCompleted => {
                self.record(100.0);
                log::info!("Attempt {} completed the level", self.attempt);
                events.push(SessionEvent::Completed);
                self.phase = SessionPhase::Victory { timer: 0.0 };
            }
        }
    }

    fn record(&mut self, percent: f32) {
        let name = self.world.level().name.clone();
        if self.records.record(&name, percent) {
            log::info!("New best on '{}': {:.0}%", name, percent);
        }
    }

    fn restart(&mut self) {
        let (world, controller) = build_attempt(&self.source, &self.settings);
        self.world = world;
        self.controller = controller;
        self.attempt += 1;
        self.phase = SessionPhase::Playing;
        log::info!("Restarting, attempt {}", self.attempt);
    }

    /// Current run progress (0-100)
    pub fn percent(&self) -> f32 {
        let level = self.world.level();
        match self.world.player() {
            Some(player) => level_progress(level, player.x()),
            None => 0.0,
        }
    }

    pub fn hud(&self) -> Hud {
        let level = self.world.level();
        Hud {
            level_name: level.name.clone(),
            gravity: level.gravity,
            scroll_speed: level.scroll_speed,
            percent: self.percent(),
            best_percent: self.records.best_percent(&level.name),
            attempt: self.attempt,
            dead: self.world.is_player_dead(),
            completed: self.world.is_level_completed(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn camera_position(&self) -> Vec2 {
        self.controller.camera_position()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &BestRecords {
        &self.records
    }
}

/// Fresh world and controller for one attempt, tuned by `settings`
fn build_attempt(source: &LevelSource, settings: &Settings) -> (GameWorld, RunController) {
    let mut level = source.build();
    if let Some(player) = level.player_mut() {
        player.set_feel(settings.feel);
    }
    let world = GameWorld::with_rules(level, settings.world_rules());
    let controller = RunController::for_world(&world, settings.speed_multiplier, settings.camera);
    (world, controller)
}
