//! Player camera: position on the grid plane, heading and field of view

use super::math::{normalize_angle, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    /// Heading in degrees, kept in [0, 360)
    pub angle: f32,
    /// Horizontal field of view in degrees
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Vec2, angle: f32, fov: f32) -> Self {
        Self {
            position,
            angle: normalize_angle(angle),
            fov,
        }
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit vector pointing to the camera's left (heading - 90)
    pub fn left(&self) -> Vec2 {
        Vec2::from_angle(self.angle - 90.0)
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.angle = normalize_angle(self.angle + degrees);
    }

    /// Heading of the first (leftmost) ray
    pub fn first_ray_angle(&self) -> f32 {
        normalize_angle(self.angle - self.fov / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_wraps() {
        let mut cam = Camera::new(Vec2::ZERO, 350.0, 60.0);
        cam.rotate(20.0);
        assert!((cam.angle - 10.0).abs() < 1e-4);
        cam.rotate(-30.0);
        assert!((cam.angle - 340.0).abs() < 1e-4);
        assert!((cam.first_ray_angle() - 310.0).abs() < 1e-4);
    }
}
