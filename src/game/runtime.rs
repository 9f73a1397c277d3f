//! Game Runtime
//!
//! The per-frame driver. A frame runs in a fixed order:
//! 1. player input (movement, weapons, interaction, floor triggers)
//! 2. wall pass: every ray column drawn, depth buffer rebuilt
//! 3. entity pass: behaviour and sprite drawing, far to near
//! 4. event drain and win/lose checks
//!
//! Sprites are tested against the depth buffer of the same frame, so the
//! wall pass always precedes the entity pass.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::player;
use super::simulation::{run_entity_pass, PassReport};
use super::world::GameWorld;
use crate::audio::AudioChannels;
use crate::input::InputSnapshot;
use crate::rasterizer::{render_view, DepthBuffer, Framebuffer, TextureTable};

/// Frame timing data for performance profiling
#[derive(Debug, Clone, Default)]
pub struct FrameTimings {
    /// Input handling time (ms)
    pub input_ms: f32,
    /// Ray casting, walls and floors (ms)
    pub walls_ms: f32,
    /// Entity behaviour and sprite drawing (ms)
    pub entities_ms: f32,
    /// Total frame time (ms)
    pub total_ms: f32,
}

impl FrameTimings {
    /// Start timing a phase (seconds on an arbitrary monotonic clock)
    pub fn start() -> f64 {
        stamp()
    }

    /// Get elapsed time in ms since start
    pub fn elapsed_ms(start: f64) -> f32 {
        ((stamp() - start) * 1000.0) as f32
    }

    /// One-line breakdown for the stats overlay
    pub fn summary(&self) -> String {
        format!(
            "frame {:.1} ms  input {:.1}  walls {:.1}  entities {:.1}",
            self.total_ms, self.input_ms, self.walls_ms, self.entities_ms
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn stamp() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

#[cfg(target_arch = "wasm32")]
fn stamp() -> f64 {
    macroquad::prelude::get_time()
}

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    /// 30 FPS
    Fps30,
    /// 60 FPS (smooth gameplay)
    #[default]
    Fps60,
    /// Unlocked (as fast as possible)
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

/// How a frame ended, from the session's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Exit reached; level money is already banked in `world.progress`
    LevelCompleted,
    PlayerDied,
}

/// A level being played: the world plus its render targets
pub struct GameRuntime {
    pub world: GameWorld,
    pub fb: Framebuffer,
    pub depth: DepthBuffer,
    pub timings: FrameTimings,
    /// Last pass report (boss bar, sprite counts)
    pub last_pass: PassReport,
}

impl GameRuntime {
    pub fn new(world: GameWorld) -> Self {
        let view = &world.config.view;
        let fb = Framebuffer::new(view.screen_width, view.screen_height);
        let depth = DepthBuffer::new(view.column_width());
        Self {
            world,
            fb,
            depth,
            timings: FrameTimings::default(),
            last_pass: PassReport::default(),
        }
    }

    /// Advance one frame. `now` is the session clock in seconds, `dt` the
    /// time since the previous frame.
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        now: f64,
        textures: &TextureTable,
        audio: &mut dyn AudioChannels,
    ) -> FrameOutcome {
        let frame_start = FrameTimings::start();
        self.world.clock = now;

        let t = FrameTimings::start();
        player::handle_input(&mut self.world, input, dt, audio);
        self.timings.input_ms = FrameTimings::elapsed_ms(t);
        if self.world.level_complete {
            self.drain_events();
            return FrameOutcome::LevelCompleted;
        }

        let t = FrameTimings::start();
        let world = &self.world;
        render_view(&mut self.fb, &world.grid, &world.camera, textures, &world.config.view, &mut self.depth);
        self.timings.walls_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        self.last_pass = run_entity_pass(&mut self.world, &mut self.fb, &self.depth, textures, dt, audio);
        self.timings.entities_ms = FrameTimings::elapsed_ms(t);

        self.drain_events();
        self.timings.total_ms = FrameTimings::elapsed_ms(frame_start);

        if self.world.stats.health <= 0 {
            log::info!("player died on level {}", self.world.level);
            return FrameOutcome::PlayerDied;
        }
        FrameOutcome::Continue
    }

    fn drain_events(&mut self) {
        for event in self.world.events.drain() {
            match event {
                GameEvent::PlayerHurt { damage, health } => {
                    log::debug!("player hurt for {} ({} left)", damage, health)
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    pub fn boss_health(&self) -> Option<f32> {
        self.last_pass.boss_health
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::config::GameConfig;
    use crate::game::entity::{Entity, EntityKind, Hostile};
    use crate::input::Action;
    use crate::progress::PlayerProgress;
    use crate::rasterizer::{Color, Texture, Vec2};
    use crate::world::{tiles, Grid};

    fn runtime(wall: i32) -> GameRuntime {
        let mut world = GameWorld::with_seed(GameConfig::default(), PlayerProgress::default(), 2);
        let edge = [1; 8];
        let row = [1, 0, wall, 0, 0, 0, 0, 1];
        let open = [1, 0, 0, 0, 0, 0, 0, 1];
        world.grid = Grid::from_wall_rows(&[&edge, &row, &open, &edge], 64.0).unwrap();
        world.camera.position = Vec2::new(96.0, 96.0);
        GameRuntime::new(world)
    }

    fn textures() -> TextureTable {
        let mut t = TextureTable::new();
        for code in 1..=30 {
            t.insert(code, Texture::solid(4, 4, Color::WHITE));
        }
        t
    }

    #[test]
    fn test_fps_limit_frame_time() {
        assert_eq!(FpsLimit::Fps30.frame_time(), Some(1.0 / 30.0));
        assert_eq!(FpsLimit::Unlocked.frame_time(), None);
        assert_eq!(FpsLimit::default().label(), "60");
    }

    #[test]
    fn test_frame_draws_walls_and_fills_depth() {
        let mut rt = runtime(0);
        let outcome = rt.frame(&InputSnapshot::default(), 0.016, 0.0, &textures(), &mut SilentAudio);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert_eq!(rt.depth.len(), rt.world.config.view.ray_count());
        // Facing the east wall down the middle of the corridor
        assert_eq!(rt.fb.get_pixel(512, 256), Some(Color::WHITE));
    }

    #[test]
    fn test_exit_completes_before_rendering() {
        let mut rt = runtime(tiles::EXIT);
        rt.world.stats.level_money = 12;
        let outcome = rt.frame(
            &InputSnapshot::pressing(&[Action::Interact]),
            0.016,
            1.0,
            &textures(),
            &mut SilentAudio,
        );
        assert_eq!(outcome, FrameOutcome::LevelCompleted);
        assert_eq!(rt.world.progress.money, 12);
        assert!(rt.depth.is_empty());
        assert!(rt.world.events.is_empty());
    }

    #[test]
    fn test_death_ends_the_level() {
        let mut rt = runtime(0);
        let mut drone = Entity::new(EntityKind::Drone(Hostile::new(1.0, 0.0)), Vec2::new(100.0, 96.0));
        drone.kind.hostile_mut().unwrap().engaged = true;
        rt.world.entities.push(drone);
        rt.world.stats.health = 5;
        let outcome = rt.frame(&InputSnapshot::default(), 0.016, 1.0, &textures(), &mut SilentAudio);
        assert_eq!(outcome, FrameOutcome::PlayerDied);
    }

    #[test]
    fn test_frame_records_phase_timings() {
        let mut rt = runtime(0);
        rt.frame(&InputSnapshot::default(), 0.016, 0.0, &textures(), &mut SilentAudio);
        let t = &rt.timings;
        assert!(t.walls_ms > 0.0);
        assert!(t.total_ms >= t.input_ms + t.walls_ms + t.entities_ms - 0.01);

        let summary = t.summary();
        assert!(summary.starts_with("frame "));
        assert!(summary.contains("walls"));
    }

    #[test]
    fn test_clock_follows_session_time() {
        let mut rt = runtime(0);
        rt.frame(&InputSnapshot::default(), 0.016, 42.5, &textures(), &mut SilentAudio);
        assert_eq!(rt.world.clock, 42.5);
    }
}
