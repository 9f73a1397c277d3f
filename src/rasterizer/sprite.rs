//! Billboard sprite projection
//!
//! Sprites are drawn texel column by texel column. Each column is mapped to
//! the ray column under it and skipped unless the sprite is nearer than the
//! wall recorded there, which is how walls hide sprites. Sprite-vs-sprite
//! ordering is left to the caller (far to near, painter's algorithm).

use super::camera::Camera;
use super::math::{deg_to_rad, Vec2};
use super::raycast::DepthBuffer;
use super::render::Framebuffer;
use super::types::Texture;
use crate::config::ViewConfig;

/// World placement of a sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub position: Vec2,
    /// Vertical screen offset at unit depth, not a true height
    pub z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Screen placement of a sprite in front of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteProjection {
    pub screen_x: f32,
    pub screen_y: f32,
    /// Plain Euclidean distance to the camera (same basis as the depth buffer)
    pub distance: f32,
    pub block_width: f32,
    pub block_height: f32,
    /// Screen distance between neighbouring texel columns / rows
    pub texel_step_x: f32,
    pub texel_step_y: f32,
}

/// Outcome of drawing one sprite
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpriteDraw {
    /// Texel columns that passed the depth test
    pub columns_visible: usize,
    pub pixels_drawn: usize,
    /// An unoccluded column landed on screen within aggro range
    pub aggro: bool,
}

/// Pinhole projection; `None` when the sprite is at or behind the camera plane
pub fn project_sprite(camera: &Camera, sprite: &Billboard, view: &ViewConfig) -> Option<SpriteProjection> {
    let offset = sprite.position - camera.position;
    let (sin, cos) = (-deg_to_rad(camera.angle)).sin_cos();
    let rot_x = offset.y * cos + offset.x * sin;
    let rot_y = offset.x * cos - offset.y * sin;
    if rot_y <= 0.0 {
        return None;
    }

    let width = view.screen_width as f32;
    let height = view.screen_height as f32;
    let focal = (width / 2.0) / deg_to_rad(camera.fov / 2.0).tan();
    let distance = offset.len();
    let block = (view.column_width() + width / distance) * view.sprite_block_factor;

    Some(SpriteProjection {
        screen_x: rot_x * focal / rot_y + width / 2.0,
        screen_y: sprite.z * focal / rot_y + height / 2.0,
        distance,
        block_width: block * sprite.scale_x,
        block_height: block * sprite.scale_y,
        texel_step_x: view.sprite_texel_spacing * sprite.scale_x / distance,
        texel_step_y: view.sprite_texel_spacing * sprite.scale_y / distance,
    })
}

/// Project and draw one sprite against this frame's depth buffer
pub fn draw_sprite(
    fb: &mut Framebuffer,
    depth: &DepthBuffer,
    camera: &Camera,
    sprite: &Billboard,
    texture: Option<&Texture>,
    view: &ViewConfig,
) -> SpriteDraw {
    let mut draw = SpriteDraw::default();
    let Some(p) = project_sprite(camera, sprite, view) else { return draw };
    let Some(tex) = texture else { return draw };

    let screen_width = view.screen_width as f32;
    let left = p.screen_x - p.block_width * tex.width as f32 / 8.0;

    for x in 0..tex.width {
        let rec_x = left + x as f32 * p.texel_step_x;
        let Some(column) = depth.column_at(rec_x) else { continue };
        if !(p.distance < depth.get(column)) {
            continue;
        }
        draw.columns_visible += 1;
        if (0.0..screen_width).contains(&rec_x) && p.distance < view.aggro_distance {
            draw.aggro = true;
        }

        // Texture rows run top-down, sprite rows are stacked upwards
        for y in 0..tex.height {
            let Some(color) = tex.sample(x as i32, (tex.height - 1 - y) as i32) else { continue };
            if color.is_transparent() {
                continue;
            }
            let rec_y = p.screen_y - y as f32 * p.texel_step_y;
            draw.pixels_drawn += fb.fill_rect(rec_x, rec_y, p.block_width, p.block_height, color);
        }
    }
    draw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn setup(wall_depth: f32) -> (Framebuffer, DepthBuffer, Camera, ViewConfig) {
        let view = ViewConfig::default();
        let fb = Framebuffer::new(view.screen_width, view.screen_height);
        let mut depth = DepthBuffer::new(view.column_width());
        for _ in 0..view.ray_count() {
            depth.push(wall_depth);
        }
        let camera = Camera::new(Vec2::new(100.0, 100.0), 0.0, view.fov);
        (fb, depth, camera, view)
    }

    fn billboard(x: f32, y: f32) -> Billboard {
        Billboard {
            position: Vec2::new(x, y),
            z: 20.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let (_, _, camera, view) = setup(100.0);
        assert!(project_sprite(&camera, &billboard(50.0, 100.0), &view).is_none());
        assert!(project_sprite(&camera, &billboard(100.0, 100.0), &view).is_none());
    }

    #[test]
    fn test_centered_projection() {
        let (_, _, camera, view) = setup(100.0);
        let p = project_sprite(&camera, &billboard(200.0, 100.0), &view).unwrap();
        assert!((p.screen_x - 512.0).abs() < 1e-3);
        assert!(p.screen_y > 256.0);
        assert!((p.distance - 100.0).abs() < 1e-4);

        // +y is to the right of a camera heading along +x
        let right = project_sprite(&camera, &billboard(200.0, 130.0), &view).unwrap();
        assert!(right.screen_x > p.screen_x);
    }

    #[test]
    fn test_wall_occludes_sprite() {
        let (mut fb, depth, camera, view) = setup(50.0);
        let tex = Texture::solid(16, 16, Color::WHITE);
        let draw = draw_sprite(&mut fb, &depth, &camera, &billboard(200.0, 100.0), Some(&tex), &view);
        assert_eq!(draw.columns_visible, 0);
        assert_eq!(draw.pixels_drawn, 0);
        assert!(!draw.aggro);
    }

    #[test]
    fn test_sprite_in_front_draws() {
        let (mut fb, depth, camera, view) = setup(500.0);
        let tex = Texture::solid(16, 16, Color::WHITE);
        let draw = draw_sprite(&mut fb, &depth, &camera, &billboard(200.0, 100.0), Some(&tex), &view);
        assert_eq!(draw.columns_visible, 16);
        assert!(draw.pixels_drawn > 0);
        assert!(draw.aggro);
    }

    #[test]
    fn test_transparent_texels_skipped() {
        let (mut fb, depth, camera, view) = setup(500.0);
        let tex = Texture::solid(8, 8, Color::with_alpha(255, 0, 0, 0));
        let draw = draw_sprite(&mut fb, &depth, &camera, &billboard(200.0, 100.0), Some(&tex), &view);
        assert_eq!(draw.pixels_drawn, 0);
        assert!(draw.columns_visible > 0);
    }

    #[test]
    fn test_aggro_is_range_limited() {
        let (mut fb, depth, camera, view) = setup(f32::INFINITY);
        let tex = Texture::solid(8, 8, Color::WHITE);
        let far = billboard(100.0 + view.aggro_distance + 50.0, 100.0);
        let draw = draw_sprite(&mut fb, &depth, &camera, &far, Some(&tex), &view);
        assert!(draw.columns_visible > 0);
        assert!(!draw.aggro);
    }

    #[test]
    fn test_missing_texture_draws_nothing() {
        let (mut fb, depth, camera, view) = setup(500.0);
        let draw = draw_sprite(&mut fb, &depth, &camera, &billboard(200.0, 100.0), None, &view);
        assert_eq!(draw, SpriteDraw::default());
    }
}
