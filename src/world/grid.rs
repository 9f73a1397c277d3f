//! Tile grid
//!
//! Three row-major layers of tile codes (walls, floor decals, ceiling decals)
//! addressed by `y * width + x`. Code 0 is "empty" on every layer. All
//! lookups go through [`Grid::cell_index`], so a coordinate outside the map
//! answers with [`tiles::NONE`] instead of touching the arrays.

use crate::rasterizer::Vec2;

/// Tile codes with gameplay meaning
pub mod tiles {
    /// Empty wall cell / no decoration. Also the out-of-range sentinel.
    pub const NONE: i32 = 0;
    /// Wall that opens when the player interacts with it
    pub const BREAKABLE: i32 = 5;
    /// Door that takes a key; the boss phases open these one at a time
    pub const LOCKED_DOOR: i32 = 7;
    pub const CRACKED_WALL: i32 = 9;
    pub const CRACKED_BLUE_WALL: i32 = 12;
    /// Interacting with the exit completes the level
    pub const EXIT: i32 = 17;
    /// Opened all at once when the boss dies
    pub const BOSS_DOOR: i32 = 20;

    /// Floor code that spawns a 3x3 spike trap at load
    pub const SPIKE_FLOOR: i32 = 18;
    /// Floor code that sends the player to the secret level
    pub const TELEPORT_FLOOR: i32 = 19;

    /// Walls a bomb can blow open
    pub fn is_cracked(code: i32) -> bool {
        code == CRACKED_WALL || code == CRACKED_BLUE_WALL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_width: f32,
    walls: Vec<i32>,
    floors: Vec<i32>,
    ceilings: Vec<i32>,
}

impl Grid {
    /// A 0x0 grid: every lookup is out of range
    pub fn empty(cell_width: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            cell_width,
            walls: Vec::new(),
            floors: Vec::new(),
            ceilings: Vec::new(),
        }
    }

    /// Build a grid from its three layers. Each layer must hold exactly
    /// `width * height` codes.
    pub fn from_layers(
        width: i32,
        height: i32,
        cell_width: f32,
        walls: Vec<i32>,
        floors: Vec<i32>,
        ceilings: Vec<i32>,
    ) -> Result<Self, String> {
        if width < 0 || height < 0 {
            return Err(format!("negative map size {}x{}", width, height));
        }
        if !(cell_width > 0.0) {
            return Err(format!("cell width must be positive, got {}", cell_width));
        }
        let cells = width as usize * height as usize;
        for (name, layer) in [("walls", &walls), ("floors", &floors), ("ceilings", &ceilings)] {
            if layer.len() != cells {
                return Err(format!(
                    "{} layer has {} tiles, expected {} ({}x{})",
                    name,
                    layer.len(),
                    cells,
                    width,
                    height
                ));
            }
        }
        Ok(Self {
            width,
            height,
            cell_width,
            walls,
            floors,
            ceilings,
        })
    }

    /// Grid with only a wall layer, from rows of codes
    #[cfg(test)]
    pub fn from_wall_rows(rows: &[&[i32]], cell_width: f32) -> Result<Self, String> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        if rows.iter().any(|r| r.len() as i32 != width) {
            return Err("rows have different lengths".to_string());
        }
        let walls: Vec<i32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let cells = walls.len();
        Self::from_layers(width, height, cell_width, walls, vec![0; cells], vec![0; cells])
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Upper bound on grid-line crossings a ray scan needs
    pub fn max_depth(&self) -> usize {
        self.width.max(self.height).max(1) as usize
    }

    pub fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn wall_at(&self, x: i32, y: i32) -> i32 {
        self.cell_index(x, y).map_or(tiles::NONE, |i| self.walls[i])
    }

    pub fn floor_at(&self, x: i32, y: i32) -> i32 {
        self.cell_index(x, y).map_or(tiles::NONE, |i| self.floors[i])
    }

    pub fn ceiling_at(&self, x: i32, y: i32) -> i32 {
        self.cell_index(x, y).map_or(tiles::NONE, |i| self.ceilings[i])
    }

    /// Overwrite a wall code; out-of-range writes are ignored
    pub fn set_wall(&mut self, x: i32, y: i32, code: i32) -> bool {
        match self.cell_index(x, y) {
            Some(i) => {
                self.walls[i] = code;
                true
            }
            None => false,
        }
    }

    /// World coordinate to tile coordinate (floors toward negative infinity)
    pub fn tile_coord(&self, v: f32) -> i32 {
        (v / self.cell_width).floor() as i32
    }

    pub fn tile_of(&self, pos: Vec2) -> (i32, i32) {
        (self.tile_coord(pos.x), self.tile_coord(pos.y))
    }

    /// Movement may enter a cell only if it is on the map and has no wall
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.cell_index(x, y).map_or(false, |i| self.walls[i] == tiles::NONE)
    }

    pub fn is_passable_at(&self, pos: Vec2) -> bool {
        let (x, y) = self.tile_of(pos);
        self.is_passable(x, y)
    }

    /// Clear the first wall (row-major) carrying `code`. Returns its cell.
    pub fn open_first(&mut self, code: i32) -> Option<(i32, i32)> {
        let i = self.walls.iter().position(|&c| c == code)?;
        self.walls[i] = tiles::NONE;
        Some(self.coords_of(i))
    }

    /// Clear every wall carrying `code`. Returns how many were opened.
    pub fn open_all(&mut self, code: i32) -> usize {
        let mut opened = 0;
        for tile in self.walls.iter_mut().filter(|c| **c == code) {
            *tile = tiles::NONE;
            opened += 1;
        }
        opened
    }

    /// Cells whose floor layer carries `code`
    pub fn cells_with_floor(&self, code: i32) -> Vec<(i32, i32)> {
        self.floors
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == code)
            .map(|(i, _)| self.coords_of(i))
            .collect()
    }

    fn coords_of(&self, index: usize) -> (i32, i32) {
        let w = self.width.max(1) as usize;
        ((index % w) as i32, (index / w) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_layers(
            3,
            2,
            64.0,
            vec![1, 0, 7, 0, 7, 20],
            vec![0, 18, 0, 19, 0, 0],
            vec![4, 4, 4, 4, 4, 4],
        )
        .unwrap()
    }

    #[test]
    fn test_out_of_range_is_sentinel() {
        let grid = sample();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MIN, i32::MAX)] {
            assert_eq!(grid.cell_index(x, y), None);
            assert_eq!(grid.wall_at(x, y), tiles::NONE);
            assert_eq!(grid.floor_at(x, y), tiles::NONE);
            assert_eq!(grid.ceiling_at(x, y), tiles::NONE);
        }
        assert_eq!(grid.wall_at(2, 1), 20);
        assert_eq!(grid.floor_at(1, 0), 18);
        assert_eq!(grid.ceiling_at(1, 1), 4);
    }

    #[test]
    fn test_tile_coord_floors_negative() {
        let grid = sample();
        assert_eq!(grid.tile_coord(63.9), 0);
        assert_eq!(grid.tile_coord(64.0), 1);
        assert_eq!(grid.tile_coord(-0.5), -1);
        assert_eq!(grid.tile_coord(-64.0), -1);
        assert_eq!(grid.tile_coord(-64.5), -2);
    }

    #[test]
    fn test_passable_excludes_out_of_range() {
        let grid = sample();
        assert!(grid.is_passable(1, 0));
        assert!(!grid.is_passable(0, 0));
        assert!(!grid.is_passable(-1, 0));
        assert!(!grid.is_passable_at(Vec2::new(-1.0, 10.0)));
    }

    #[test]
    fn test_open_first_and_all() {
        let mut grid = sample();
        assert_eq!(grid.open_first(7), Some((2, 0)));
        assert_eq!(grid.wall_at(1, 1), 7);
        assert_eq!(grid.open_first(7), Some((1, 1)));
        assert_eq!(grid.open_first(7), None);
        assert_eq!(grid.open_all(20), 1);
        assert_eq!(grid.open_all(20), 0);
    }

    #[test]
    fn test_layer_size_validation() {
        assert!(Grid::from_layers(2, 2, 64.0, vec![0; 4], vec![0; 3], vec![0; 4]).is_err());
        assert!(Grid::from_layers(-1, 2, 64.0, vec![], vec![], vec![]).is_err());
        assert!(Grid::from_wall_rows(&[&[1, 1], &[1]], 64.0).is_err());
    }

    #[test]
    fn test_cells_with_floor() {
        let grid = sample();
        assert_eq!(grid.cells_with_floor(tiles::SPIKE_FLOOR), vec![(1, 0)]);
        assert_eq!(grid.cells_with_floor(tiles::TELEPORT_FLOOR), vec![(0, 1)]);
    }
}
