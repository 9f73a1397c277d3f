//! Game configuration
//!
//! Every rendering and gameplay tunable lives in [`GameConfig`]. The game
//! reads `config.ron` from the working directory at startup; a missing file
//! means "all defaults", and any field left out of the file keeps its default
//! through `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::game::FpsLimit;

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

/// Screen and projection settings shared by the ray caster and sprite projector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    /// Horizontal field of view in degrees
    pub fov: f32,
    /// Angular distance between two cast rays, in degrees
    pub ray_step: f32,
    /// World units per grid cell side
    pub cell_width: f32,
    /// Horizontal bands per wall strip (one texture row each)
    pub wall_bands: usize,
    /// Numerator of the floor back-projection (`k / row_offset`)
    pub floor_projection: f32,
    /// World position scale applied before floor lookups
    pub floor_sample_scale: f32,
    /// Floor tile side in scaled floor space
    pub floor_tile_size: f32,
    /// Sprite texel block size factor
    pub sprite_block_factor: f32,
    /// Screen spacing of sprite texels at unit distance
    pub sprite_texel_spacing: f32,
    /// Enemies farther than this never notice the player
    pub aggro_distance: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 512,
            fov: 60.0,
            ray_step: 0.25,
            cell_width: 64.0,
            wall_bands: 32,
            floor_projection: 8064.0,
            floor_sample_scale: 0.5,
            floor_tile_size: 32.0,
            sprite_block_factor: 0.45,
            sprite_texel_spacing: 256.0,
            aggro_distance: 1000.0,
        }
    }
}

impl ViewConfig {
    /// Number of rays cast per frame (one depth value each)
    pub fn ray_count(&self) -> usize {
        if self.ray_step <= 0.0 {
            return 0;
        }
        (self.fov / self.ray_step).round().max(0.0) as usize
    }

    /// Screen width covered by one ray
    pub fn column_width(&self) -> f32 {
        (self.screen_width as f32 / self.fov) * self.ray_step
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    /// Strafing runs at `move_speed / strafe_divisor`
    pub strafe_divisor: f32,
    /// Degrees per second
    pub turn_speed_fast: f32,
    pub turn_speed_slow: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_angle: f32,
    pub start_health: i32,
    /// How far ahead the interact key probes for a tile
    pub interact_reach: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 100.0,
            strafe_divisor: 1.5,
            turn_speed_fast: 180.0,
            turn_speed_slow: 30.0,
            spawn_x: 80.0,
            spawn_y: 80.0,
            spawn_angle: 0.0,
            start_health: 100,
            interact_reach: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub pickup_radius: f32,
    pub hit_radius: f32,
    pub melee_range: f32,
    pub bullet_speed: f32,
    pub bullet_z: f32,
    pub enemy_bullet_damage: i32,
    pub enemy_bullet_scale: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            pickup_radius: 15.0,
            hit_radius: 10.0,
            melee_range: 10.0,
            bullet_speed: 300.0,
            bullet_z: 7.0,
            enemy_bullet_damage: 1,
            enemy_bullet_scale: 0.5,
        }
    }
}

/// Regular enemies and traps. All `*_ms` values are strict cooldowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub enemy_speed: f32,
    pub hammer_speed: f32,
    pub drone_speed: f32,
    pub melee_cooldown_ms: u32,
    pub melee_damage: i32,
    pub hammer_cooldown_ms: u32,
    pub hammer_damage: i32,
    pub drone_damage: i32,
    pub shooter_cooldown_ms: u32,
    pub spike_interval_ms: u32,
    pub spike_cooldown_ms: u32,
    pub spike_damage: i32,
    /// Inactive entities tolerated before the collection is compacted
    pub compact_threshold: usize,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            enemy_speed: 35.0,
            hammer_speed: 20.0,
            drone_speed: 120.0,
            melee_cooldown_ms: 1000,
            melee_damage: 5,
            hammer_cooldown_ms: 2000,
            hammer_damage: 25,
            drone_damage: 10,
            shooter_cooldown_ms: 500,
            spike_interval_ms: 2500,
            spike_cooldown_ms: 5000,
            spike_damage: 1,
            compact_threshold: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub pistol_cooldown_ms: u32,
    pub pistol_upgrade_bonus_ms: u32,
    pub shotgun_cooldown_ms: u32,
    pub minigun_cooldown_ms: u32,
    pub minigun_upgrade_bonus_ms: u32,
    /// Minigun pellets deviate uniformly within +/- this many degrees
    pub minigun_spread: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            pistol_cooldown_ms: 500,
            pistol_upgrade_bonus_ms: 100,
            shotgun_cooldown_ms: 1000,
            minigun_cooldown_ms: 75,
            minigun_upgrade_bonus_ms: 5,
            minigun_spread: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub initial_health: f32,
    pub spread_cooldown_ms: u32,
    pub ring_interval_ms: u32,
    pub ring_step_deg: u32,
    pub bullet_scale: f32,
    pub strafe_speed: f32,
    pub strafe_min_ms: u32,
    pub strafe_max_ms: u32,
    pub charge_min_ms: u32,
    pub charge_max_ms: u32,
    /// Charge interval used once strafing runs into a wall
    pub blocked_charge_ms: u32,
    pub charge_duration_ms: u32,
    pub charge_speed: f32,
    pub charge_range: f32,
    pub charge_damage: i32,
    pub charge_cooldown_ms: u32,
    pub reward: i32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            initial_health: 1000.0,
            spread_cooldown_ms: 2000,
            ring_interval_ms: 10000,
            ring_step_deg: 8,
            bullet_scale: 0.75,
            strafe_speed: 40.0,
            strafe_min_ms: 5000,
            strafe_max_ms: 10000,
            charge_min_ms: 5000,
            charge_max_ms: 7000,
            blocked_charge_ms: 100,
            charge_duration_ms: 150,
            charge_speed: 750.0,
            charge_range: 15.0,
            charge_damage: 25,
            charge_cooldown_ms: 1000,
            reward: 100,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub view: ViewConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub enemies: EnemyConfig,
    pub weapons: WeaponConfig,
    pub boss: BossConfig,
    pub fps_limit: FpsLimit,
    /// Draw frame timings and sprite counts over the HUD
    pub show_frame_stats: bool,
    /// Directory holding `map*.dat` / `sprites*.dat`
    pub level_dir: String,
    pub texture_dir: String,
    pub sound_dir: String,
    pub save_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            player: PlayerConfig::default(),
            combat: CombatConfig::default(),
            enemies: EnemyConfig::default(),
            weapons: WeaponConfig::default(),
            boss: BossConfig::default(),
            fps_limit: FpsLimit::default(),
            show_frame_stats: false,
            level_dir: ".".to_string(),
            texture_dir: "textures".to_string(),
            sound_dir: "sounds".to_string(),
            save_path: "save.dat".to_string(),
        }
    }
}

/// Parse a config from RON text
pub fn parse_config(s: &str) -> Result<GameConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Load the config, falling back to defaults when the file is missing or broken
pub fn load_or_default<P: AsRef<Path>>(path: P) -> GameConfig {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No {} found, using default settings", path.display());
        return GameConfig::default();
    }
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded settings from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config("(view: (fov: 90.0), enemies: (drone_damage: 3))").unwrap();
        assert_eq!(config.view.fov, 90.0);
        assert_eq!(config.view.cell_width, 64.0);
        assert_eq!(config.enemies.drone_damage, 3);
        assert_eq!(config.player, PlayerConfig::default());
        assert!(!config.show_frame_stats);
        assert!(parse_config("(show_frame_stats: true)").unwrap().show_frame_stats);
    }

    #[test]
    fn test_ray_count_and_column_width() {
        let view = ViewConfig::default();
        assert_eq!(view.ray_count(), 240);
        assert!((view.column_width() * view.ray_count() as f32 - 1024.0).abs() < 0.01);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(save_path: \"slot1.dat\", fps_limit: Fps30)").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.save_path, "slot1.dat");
        assert_eq!(config.fps_limit, FpsLimit::Fps30);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid ron data").unwrap();

        assert!(load_config(file.path()).is_err());
        assert_eq!(load_or_default(file.path()), GameConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_or_default(dir.path().join("config.ron"));
        assert_eq!(config, GameConfig::default());
    }
}
