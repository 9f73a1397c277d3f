//! 2D vector math and angle helpers
//!
//! Angles are in degrees throughout the game; +x is heading 0 and headings
//! grow clockwise on screen because +y points down.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// 2D Vector in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`
    pub fn from_angle(degrees: f32) -> Self {
        let r = deg_to_rad(degrees);
        Self { x: r.cos(), y: r.sin() }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).len()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 {
            x: self.x / l,
            y: self.y / l,
        }
    }

    /// Heading of this vector in degrees, in (-180, 180]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Wrap an angle into [0, 360)
pub fn normalize_angle(degrees: f32) -> f32 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(-30.0), 330.0);
        assert_eq!(normalize_angle(725.0), 5.0);
        assert!(normalize_angle(-1e-9) < 360.0);
    }

    #[test]
    fn test_from_angle_screen_convention() {
        let down = Vec2::from_angle(90.0);
        assert!(down.x.abs() < 1e-6);
        assert!((down.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_and_normalize() {
        let v = Vec2::new(0.0, -3.0);
        assert!((v.angle() + 90.0).abs() < 1e-4);
        assert!((v.normalize().len() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }
}
