//! Game World
//!
//! The session context for one run of play: the grid, the entity list, the
//! camera, the player's counters, boss door flags, the level clock and the
//! random source. Every gameplay system takes a `&mut GameWorld`, so tests
//! can build as many independent worlds as they like and drive them with
//! exact clock values.
//!
//! A level (re)load replaces the grid and the entity list wholesale.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::boss::BossPhase;
use super::entity::{Entity, EntityKind};
use super::event::{EventQueue, GameEvent};
use super::weapon::Armory;
use crate::audio::ChannelId;
use crate::config::GameConfig;
use crate::progress::PlayerProgress;
use crate::rasterizer::{Camera, Vec2};
use crate::world::{level_paths, load_entities, load_grid, tiles, EntityRecord, Grid, SECRET_LEVEL};

/// `cooldown_ms` has fully elapsed between `since` and `now` (seconds)
pub fn cooldown_ready(now: f64, since: f64, cooldown_ms: u32) -> bool {
    (now - since) * 1000.0 > cooldown_ms as f64
}

/// Spike trap layout inside a spike-floor cell
const SPIKE_GRID: usize = 3;
const SPIKE_INSET: f32 = 16.0;
const SPIKE_SPACING: f32 = 16.0;

/// Per-level player counters
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub health: i32,
    /// Money picked up this level, banked on completion
    pub level_money: i32,
    pub keys: i32,
    pub bombs: i32,
    pub step_channel: Option<ChannelId>,
}

impl PlayerStats {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            level_money: 0,
            keys: 0,
            bombs: 0,
            step_channel: None,
        }
    }
}

pub struct GameWorld {
    pub config: GameConfig,
    pub grid: Grid,
    pub entities: Vec<Entity>,
    /// Entities created during the entity pass, appended after it
    pub spawns: EventQueue<Entity>,
    pub events: EventQueue<GameEvent>,
    pub camera: Camera,
    pub stats: PlayerStats,
    pub armory: Armory,
    pub boss_phase: BossPhase,
    pub progress: PlayerProgress,
    /// Level being played (menu number, kept through a teleport)
    pub level: u32,
    pub level_complete: bool,
    /// Seconds, set by the runtime at the top of every frame
    pub clock: f64,
    pub rng: StdRng,
}

impl GameWorld {
    pub fn new(config: GameConfig, progress: PlayerProgress) -> Self {
        Self::with_rng(config, progress, StdRng::from_entropy())
    }

    /// Deterministic world from a fixed rng seed
    #[cfg(test)]
    pub fn with_seed(config: GameConfig, progress: PlayerProgress, seed: u64) -> Self {
        Self::with_rng(config, progress, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, progress: PlayerProgress, rng: StdRng) -> Self {
        let camera = spawn_camera(&config);
        let grid = Grid::empty(config.view.cell_width);
        let stats = PlayerStats::new(config.player.start_health);
        Self {
            config,
            grid,
            entities: Vec::new(),
            spawns: EventQueue::new(),
            events: EventQueue::new(),
            camera,
            stats,
            armory: Armory::default(),
            boss_phase: BossPhase::default(),
            progress,
            level: 0,
            level_complete: false,
            clock: 0.0,
            rng,
        }
    }

    // =========================================================================
    // Level lifecycle
    // =========================================================================

    /// Load level `level` from the level directory and reset the player
    pub fn start_level(&mut self, level: u32) {
        let (grid, records) = self.read_level(level);
        self.install_level(level, grid, &records);
    }

    /// Start a level from already loaded data
    pub fn install_level(&mut self, level: u32, grid: Grid, records: &[EntityRecord]) {
        self.level = level;
        self.level_complete = false;
        let step_channel = self.stats.step_channel.take();
        self.stats = PlayerStats::new(self.config.player.start_health);
        self.stats.step_channel = step_channel;
        self.populate(grid, records);
        log::info!(
            "level {} started: {}x{} grid, {} entities",
            level,
            self.grid.width(),
            self.grid.height(),
            self.entities.len()
        );
    }

    /// Jump to the secret level. Money, keys and bombs carry over; health
    /// and position reset.
    pub fn teleport(&mut self) {
        let (grid, records) = self.read_level(SECRET_LEVEL);
        self.stats.health = self.config.player.start_health;
        self.populate(grid, &records);
        self.events.send(GameEvent::Teleported { level: SECRET_LEVEL });
        log::info!("teleported to level {}", SECRET_LEVEL);
    }

    /// Bank this level's money and mark the level beaten
    pub fn complete_level(&mut self) {
        self.progress.record_level(self.level, self.stats.level_money);
        self.level_complete = true;
        self.events.send(GameEvent::LevelCompleted {
            level: self.level,
            money: self.stats.level_money,
        });
        log::info!("level {} complete, banked {}", self.level, self.stats.level_money);
    }

    fn read_level(&self, level: u32) -> (Grid, Vec<EntityRecord>) {
        let (map_path, sprite_path) = level_paths(&self.config.level_dir, level);
        let cell_width = self.config.view.cell_width;
        let grid = load_grid(&map_path, cell_width).unwrap_or_else(|e| {
            log::warn!("map {} not loaded: {}", map_path.display(), e);
            Grid::empty(cell_width)
        });
        let records = load_entities(&sprite_path).unwrap_or_else(|e| {
            log::warn!("sprites {} not loaded: {}", sprite_path.display(), e);
            Vec::new()
        });
        (grid, records)
    }

    fn populate(&mut self, grid: Grid, records: &[EntityRecord]) {
        let now = self.clock;
        self.grid = grid;
        self.entities.clear();
        self.spawns.clear();
        self.boss_phase = BossPhase::default();
        self.camera = spawn_camera(&self.config);

        let cell = self.grid.cell_width();
        for (cx, cy) in self.grid.cells_with_floor(tiles::SPIKE_FLOOR) {
            for i in 0..SPIKE_GRID {
                for j in 0..SPIKE_GRID {
                    let x = cx as f32 * cell + SPIKE_INSET + i as f32 * SPIKE_SPACING;
                    let y = cy as f32 * cell + SPIKE_INSET + j as f32 * SPIKE_SPACING;
                    self.entities.push(Entity::spike(Vec2::new(x, y), now));
                }
            }
        }

        let mut skipped = 0;
        for record in records {
            let timers = self.boss_timers();
            match Entity::from_record(record, &self.config, now, timers) {
                Some(entity) => self.entities.push(entity),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("skipped {} entity records with unknown kind codes", skipped);
        }
    }

    // =========================================================================
    // Shared gameplay helpers
    // =========================================================================

    pub fn player_position(&self) -> Vec2 {
        self.camera.position
    }

    pub fn hurt_player(&mut self, damage: i32) {
        self.stats.health -= damage;
        self.events.send(GameEvent::PlayerHurt {
            damage,
            health: self.stats.health,
        });
    }

    /// Uniform integer in `[min, max)`, or `min` for an empty range
    pub fn random_ms(&mut self, min: u32, max: u32) -> u32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Fresh (strafe, charge) intervals for a boss
    pub fn boss_timers(&mut self) -> (u32, u32) {
        let boss = &self.config.boss;
        let (s0, s1, c0, c1) = (boss.strafe_min_ms, boss.strafe_max_ms, boss.charge_min_ms, boss.charge_max_ms);
        (self.random_ms(s0, s1), self.random_ms(c0, c1))
    }

    /// Append queued spawns to the entity list
    pub fn flush_spawns(&mut self) -> usize {
        self.spawns.drain_into(&mut self.entities)
    }

    /// Drop dead entities once enough have piled up. Spikes are kept since
    /// they come back.
    pub fn compact(&mut self) -> usize {
        let dead = self
            .entities
            .iter()
            .filter(|e| !e.active && !matches!(e.kind, EntityKind::Spike(_)))
            .count();
        if dead <= self.config.enemies.compact_threshold {
            return 0;
        }
        self.entities.retain(|e| e.active || matches!(e.kind, EntityKind::Spike(_)));
        dead
    }
}

fn spawn_camera(config: &GameConfig) -> Camera {
    let p = &config.player;
    Camera::new(Vec2::new(p.spawn_x, p.spawn_y), p.spawn_angle, config.view.fov)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_files::{encode_entities, encode_grid, record};
    use std::fs;
    use tempfile::TempDir;

    fn world() -> GameWorld {
        GameWorld::with_seed(GameConfig::default(), PlayerProgress::default(), 42)
    }

    fn open_grid(size: i32, floors: Vec<i32>) -> Grid {
        let cells = (size * size) as usize;
        Grid::from_layers(size, size, 64.0, vec![0; cells], floors, vec![0; cells]).unwrap()
    }

    #[test]
    fn test_cooldown_ready_is_strict() {
        assert!(!cooldown_ready(1.0, 0.0, 1000));
        assert!(cooldown_ready(1.001, 0.0, 1000));
        assert!(cooldown_ready(0.0, f64::NEG_INFINITY, 500));
    }

    #[test]
    fn test_install_level_resets_session() {
        let mut w = world();
        w.stats.health = 3;
        w.stats.level_money = 50;
        w.stats.keys = 2;
        w.camera.position = Vec2::new(500.0, 500.0);
        w.boss_phase.latch(0.1);

        w.install_level(2, open_grid(4, vec![0; 16]), &[record(7, 100.0, 100.0), record(99, 0.0, 0.0)]);

        assert_eq!(w.level, 2);
        assert_eq!(w.stats.health, 100);
        assert_eq!(w.stats.level_money, 0);
        assert_eq!(w.stats.keys, 0);
        assert_eq!(w.camera.position, Vec2::new(80.0, 80.0));
        assert_eq!(w.camera.fov, 60.0);
        assert_eq!(w.boss_phase, BossPhase::default());
        // The unknown kind code is skipped, the coin is kept
        assert_eq!(w.entities.len(), 1);
    }

    #[test]
    fn test_spike_floor_spawns_three_by_three() {
        let mut floors = vec![0; 16];
        floors[1 * 4 + 2] = tiles::SPIKE_FLOOR;
        let mut w = world();
        w.install_level(1, open_grid(4, floors), &[]);

        let spikes: Vec<Vec2> = w
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Spike(_)))
            .map(|e| e.position)
            .collect();
        assert_eq!(spikes.len(), 9);
        assert!(spikes.contains(&Vec2::new(2.0 * 64.0 + 16.0, 64.0 + 16.0)));
        assert!(spikes.contains(&Vec2::new(2.0 * 64.0 + 48.0, 64.0 + 48.0)));
    }

    #[test]
    fn test_start_level_reads_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("map3.dat"), encode_grid(2, 2, &[0, 1, 0, 0], &[0; 4], &[0; 4])).unwrap();
        fs::write(dir.path().join("sprites3.dat"), encode_entities(&[record(1, 10.0, 10.0), record(3, 90.0, 90.0)])).unwrap();

        let mut config = GameConfig::default();
        config.level_dir = dir.path().to_string_lossy().into_owned();
        let mut w = GameWorld::with_seed(config, PlayerProgress::default(), 1);
        w.start_level(3);

        assert_eq!(w.grid.wall_at(1, 0), 1);
        assert_eq!(w.entities.len(), 2);
    }

    #[test]
    fn test_missing_level_files_degrade_to_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = GameConfig::default();
        config.level_dir = dir.path().to_string_lossy().into_owned();
        let mut w = GameWorld::with_seed(config, PlayerProgress::default(), 1);
        w.start_level(5);

        assert_eq!(w.grid.width(), 0);
        assert!(w.entities.is_empty());
        assert_eq!(w.stats.health, 100);
    }

    #[test]
    fn test_teleport_keeps_level_money() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("map11.dat"), encode_grid(1, 1, &[0], &[0], &[0])).unwrap();
        let mut config = GameConfig::default();
        config.level_dir = dir.path().to_string_lossy().into_owned();
        let mut w = GameWorld::with_seed(config, PlayerProgress::default(), 1);
        w.install_level(4, open_grid(2, vec![0; 4]), &[record(7, 10.0, 10.0)]);
        w.stats.level_money = 30;
        w.stats.health = 12;

        w.teleport();

        assert_eq!(w.level, 4);
        assert_eq!(w.stats.level_money, 30);
        assert_eq!(w.stats.health, 100);
        assert_eq!(w.grid.width(), 1);
        assert!(w.entities.is_empty());
        assert!(w.events.iter().any(|e| *e == GameEvent::Teleported { level: SECRET_LEVEL }));
    }

    #[test]
    fn test_complete_level_banks_money() {
        let mut w = world();
        w.install_level(6, open_grid(2, vec![0; 4]), &[]);
        w.stats.level_money = 25;
        w.complete_level();
        assert!(w.level_complete);
        assert_eq!(w.progress.money, 25);
        assert_eq!(w.progress.highest_level_beaten, 6);
    }

    #[test]
    fn test_compaction_keeps_spikes_and_live_entities() {
        let mut w = world();
        w.config.enemies.compact_threshold = 2;
        for i in 0..3 {
            let mut dead = Entity::bullet(Vec2::new(i as f32, 0.0), 0.0, 1, 0.5, 7.0);
            dead.active = false;
            w.entities.push(dead);
        }
        let mut spike = Entity::spike(Vec2::ZERO, 0.0);
        spike.active = false;
        w.entities.push(spike);
        w.entities.push(Entity::bullet(Vec2::ZERO, 0.0, 1, 0.5, 7.0));

        assert_eq!(w.compact(), 3);
        assert_eq!(w.entities.len(), 2);
        assert_eq!(w.compact(), 0);
    }

    #[test]
    fn test_random_ms_handles_empty_range() {
        let mut w = world();
        assert_eq!(w.random_ms(100, 100), 100);
        let v = w.random_ms(5000, 10000);
        assert!((5000..10000).contains(&v));
    }
}
