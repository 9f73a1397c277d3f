//! Grid collision
//!
//! One rule for the player and every moving entity: a move is split into
//! its X and Y parts, and each part is kept only if the cell it lands in is
//! passable. Testing the axes separately lets movers slide along walls.
//! X is resolved first, Y is then tested from the updated X.

use crate::rasterizer::Vec2;
use crate::world::Grid;

/// Result of a collision-gated move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideResult {
    /// Position after the allowed parts of the move
    pub position: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl SlideResult {
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Move `from` by `delta`, axis by axis
pub fn slide(grid: &Grid, from: Vec2, delta: Vec2) -> SlideResult {
    let mut position = from;

    let x = from.x + delta.x;
    let blocked_x = !grid.is_passable_at(Vec2::new(x, position.y));
    if !blocked_x {
        position.x = x;
    }

    let y = from.y + delta.y;
    let blocked_y = !grid.is_passable_at(Vec2::new(position.x, y));
    if !blocked_y {
        position.y = y;
    }

    SlideResult {
        position,
        blocked_x,
        blocked_y,
    }
}

/// A projectile at `pos` has hit a wall or left the map
pub fn hits_wall(grid: &Grid, pos: Vec2) -> bool {
    !grid.is_passable_at(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Grid {
        Grid::from_wall_rows(
            &[
                &[1, 1, 1, 1],
                &[1, 0, 0, 1],
                &[1, 0, 0, 1],
                &[1, 1, 1, 1],
            ],
            64.0,
        )
        .unwrap()
    }

    #[test]
    fn test_free_move() {
        let r = slide(&room(), Vec2::new(80.0, 80.0), Vec2::new(10.0, 20.0));
        assert_eq!(r.position, Vec2::new(90.0, 100.0));
        assert!(!r.blocked());
    }

    #[test]
    fn test_slides_along_wall() {
        // Moving diagonally into the top wall keeps the X part
        let r = slide(&room(), Vec2::new(80.0, 70.0), Vec2::new(10.0, -10.0));
        assert_eq!(r.position, Vec2::new(90.0, 70.0));
        assert!(!r.blocked_x);
        assert!(r.blocked_y);

        // And into the left wall keeps the Y part
        let r = slide(&room(), Vec2::new(70.0, 80.0), Vec2::new(-10.0, 10.0));
        assert_eq!(r.position, Vec2::new(70.0, 90.0));
        assert!(r.blocked_x);
        assert!(!r.blocked_y);
    }

    #[test]
    fn test_map_edge_blocks() {
        let open = Grid::from_wall_rows(&[&[0, 0], &[0, 0]], 64.0).unwrap();
        let r = slide(&open, Vec2::new(5.0, 5.0), Vec2::new(-10.0, -10.0));
        assert_eq!(r.position, Vec2::new(5.0, 5.0));
        assert!(r.blocked_x && r.blocked_y);
        assert!(hits_wall(&open, Vec2::new(-1.0, 5.0)));
        assert!(!hits_wall(&open, Vec2::new(100.0, 5.0)));
    }
}
