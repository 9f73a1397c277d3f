//! Level loading
//!
//! Levels ship as two little-endian binary files:
//!
//! - `map*.dat`: `i32 width; i32 height;` then three layers (walls, floor,
//!   ceiling), each `u64 count; i32 × count`.
//! - `sprites*.dat`: `i32 count;` then per record `i32 kind; f32 x, y, z;
//!   f32 scale_x, scale_y; u8 active; u8 has_health [f32 health];
//!   u8 has_direction [f32 direction]`.
//!
//! Kind codes are not checked here; the game decides which records it can
//! spawn and skips the rest.

use std::fs;
use std::path::{Path, PathBuf};

use super::grid::Grid;
use crate::rasterizer::Vec2;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum grid dimension (width or height)
    pub const MAX_MAP_SIZE: i32 = 1024;
    /// Maximum number of entity records in one file
    pub const MAX_ENTITIES: i32 = 65_536;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Levels reachable from the main menu
pub const MENU_LEVELS: u32 = 10;
/// Level reached only through a teleport floor
pub const SECRET_LEVEL: u32 = 11;

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    TruncatedError(&'static str),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::TruncatedError(what) => write!(f, "File ends while reading {}", what),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

/// One entity as stored on disk
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// 1-based kind code
    pub kind_code: i32,
    pub position: Vec2,
    pub z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub active: bool,
    pub health: Option<f32>,
    pub direction: Option<f32>,
}

/// Map and sprite file paths for a level number
///
/// Level 1 uses the bare names (`map.dat`, `sprites.dat`), every other level
/// appends its number.
pub fn level_paths<P: AsRef<Path>>(dir: P, level: u32) -> (PathBuf, PathBuf) {
    let dir = dir.as_ref();
    if level <= 1 {
        (dir.join("map.dat"), dir.join("sprites.dat"))
    } else {
        (
            dir.join(format!("map{}.dat", level)),
            dir.join(format!("sprites{}.dat", level)),
        )
    }
}

/// Cursor over little-endian bytes
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], LevelError> {
        let end = self.pos.checked_add(N).ok_or(LevelError::TruncatedError(what))?;
        let slice = self.bytes.get(self.pos..end).ok_or(LevelError::TruncatedError(what))?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }

    fn read_i32(&mut self, what: &'static str) -> Result<i32, LevelError> {
        Ok(i32::from_le_bytes(self.take(what)?))
    }

    fn read_u64(&mut self, what: &'static str) -> Result<u64, LevelError> {
        Ok(u64::from_le_bytes(self.take(what)?))
    }

    fn read_f32(&mut self, what: &'static str) -> Result<f32, LevelError> {
        Ok(f32::from_le_bytes(self.take(what)?))
    }

    fn read_bool(&mut self, what: &'static str) -> Result<bool, LevelError> {
        let [b] = self.take::<1>(what)?;
        Ok(b != 0)
    }

    fn read_layer(&mut self, what: &'static str) -> Result<Vec<i32>, LevelError> {
        let count = self.read_u64(what)?;
        let remaining = (self.bytes.len() - self.pos) as u64 / 4;
        if count > remaining {
            return Err(LevelError::TruncatedError(what));
        }
        (0..count).map(|_| self.read_i32(what)).collect()
    }
}

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Parse a map file
pub fn parse_grid(bytes: &[u8], cell_width: f32) -> Result<Grid, LevelError> {
    let mut r = ByteReader::new(bytes);
    let width = r.read_i32("map width")?;
    let height = r.read_i32("map height")?;
    if !(0..=limits::MAX_MAP_SIZE).contains(&width) || !(0..=limits::MAX_MAP_SIZE).contains(&height) {
        return Err(LevelError::ValidationError(format!(
            "map size {}x{} outside 0..={}",
            width,
            height,
            limits::MAX_MAP_SIZE
        )));
    }
    let walls = r.read_layer("wall layer")?;
    let floors = r.read_layer("floor layer")?;
    let ceilings = r.read_layer("ceiling layer")?;
    Grid::from_layers(width, height, cell_width, walls, floors, ceilings).map_err(LevelError::ValidationError)
}

/// Parse an entity file
pub fn parse_entities(bytes: &[u8]) -> Result<Vec<EntityRecord>, LevelError> {
    let mut r = ByteReader::new(bytes);
    let count = r.read_i32("entity count")?;
    if !(0..=limits::MAX_ENTITIES).contains(&count) {
        return Err(LevelError::ValidationError(format!(
            "entity count {} outside 0..={}",
            count,
            limits::MAX_ENTITIES
        )));
    }

    let mut records = Vec::with_capacity(count as usize);
    for i in 0..count {
        let kind_code = r.read_i32("entity kind")?;
        let x = r.read_f32("entity position")?;
        let y = r.read_f32("entity position")?;
        let z = r.read_f32("entity position")?;
        let scale_x = r.read_f32("entity scale")?;
        let scale_y = r.read_f32("entity scale")?;
        let active = r.read_bool("entity active flag")?;
        let health = if r.read_bool("entity health flag")? {
            Some(r.read_f32("entity health")?)
        } else {
            None
        };
        let direction = if r.read_bool("entity direction flag")? {
            Some(r.read_f32("entity direction")?)
        } else {
            None
        };

        let fields = [Some(x), Some(y), Some(z), Some(scale_x), Some(scale_y), health, direction];
        if let Some(bad) = fields.into_iter().flatten().find(|v| !is_valid_float(*v)) {
            log::warn!("skipping entity {}: invalid value {}", i, bad);
            continue;
        }

        records.push(EntityRecord {
            kind_code,
            position: Vec2::new(x, y),
            z,
            scale_x,
            scale_y,
            active,
            health,
            direction,
        });
    }
    Ok(records)
}

pub fn load_grid<P: AsRef<Path>>(path: P, cell_width: f32) -> Result<Grid, LevelError> {
    let bytes = fs::read(path)?;
    parse_grid(&bytes, cell_width)
}

pub fn load_entities<P: AsRef<Path>>(path: P) -> Result<Vec<EntityRecord>, LevelError> {
    let bytes = fs::read(path)?;
    parse_entities(&bytes)
}


#[cfg(test)]
mod tests {
    use super::test_files::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_grid() {
        let bytes = encode_grid(2, 1, &[1, 0], &[0, 18], &[3, 3]);
        let grid = parse_grid(&bytes, 64.0).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.wall_at(0, 0), 1);
        assert_eq!(grid.floor_at(1, 0), 18);
        assert_eq!(grid.ceiling_at(1, 0), 3);
    }

    #[test]
    fn test_grid_count_mismatch_rejected() {
        let bytes = encode_grid(2, 2, &[1, 0, 0], &[0; 4], &[0; 4]);
        assert!(matches!(parse_grid(&bytes, 64.0), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_truncated_grid() {
        let mut bytes = encode_grid(2, 2, &[0; 4], &[0; 4], &[0; 4]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(parse_grid(&bytes, 64.0), Err(LevelError::TruncatedError(_))));
    }

    #[test]
    fn test_huge_layer_count_is_truncation_not_allocation() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(parse_grid(&bytes, 64.0), Err(LevelError::TruncatedError(_))));
    }

    #[test]
    fn test_parse_entities_with_optionals() {
        let mut drone = record(10, 100.0, 50.0);
        drone.health = Some(3.0);
        let mut bullet = record(5, 1.0, 2.0);
        bullet.direction = Some(90.0);
        bullet.active = false;
        let bad = record(99, 0.0, 0.0);

        let parsed = parse_entities(&encode_entities(&[drone.clone(), bad.clone(), bullet.clone()])).unwrap();
        assert_eq!(parsed, vec![drone, bad, bullet]);
    }

    #[test]
    fn test_bad_floats_skip_only_their_record() {
        let coin = record(3, 10.0, 10.0);
        let mut bad_scale = record(1, 20.0, 20.0);
        bad_scale.scale_x = f32::NAN;
        let mut bad_health = record(1, 30.0, 30.0);
        bad_health.health = Some(f32::NAN);
        let mut far = record(2, 40.0, 40.0);
        far.direction = Some(f32::INFINITY);
        let key = record(4, 50.0, 50.0);

        let parsed = parse_entities(&encode_entities(&[coin.clone(), bad_scale, bad_health, far, key.clone()])).unwrap();
        assert_eq!(parsed, vec![coin, key]);
    }

    #[test]
    fn test_level_paths() {
        let (map, sprites) = level_paths("data", 1);
        assert_eq!(map, Path::new("data").join("map.dat"));
        assert_eq!(sprites, Path::new("data").join("sprites.dat"));
        let (map, sprites) = level_paths("data", SECRET_LEVEL);
        assert_eq!(map, Path::new("data").join("map11.dat"));
        assert_eq!(sprites, Path::new("data").join("sprites11.dat"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load_grid(dir.path().join("map.dat"), 64.0), Err(LevelError::IoError(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let (map, sprites) = level_paths(dir.path(), 3);
        std::fs::write(&map, encode_grid(1, 1, &[0], &[0], &[0])).unwrap();
        std::fs::write(&sprites, encode_entities(&[record(7, 32.0, 32.0)])).unwrap();

        assert_eq!(load_grid(&map, 64.0).unwrap().width(), 1);
        assert_eq!(load_entities(&sprites).unwrap().len(), 1);
    }
}
