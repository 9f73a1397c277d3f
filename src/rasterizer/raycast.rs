//! Grid ray caster
//!
//! One ray per `ray_step` degrees across the field of view. Each ray is
//! marched twice, once along the horizontal grid lines and once along the
//! vertical ones; the nearer hit wins. The raw hit distance goes into the
//! [`DepthBuffer`] for sprite occlusion while the fish-eye corrected distance
//! sizes the wall strip.
//!
//! Walls are drawn as `wall_bands` flat bands per strip, one texture row per
//! band. Floors and ceilings are back-projected per screen row below and
//! above the strip.

use super::camera::Camera;
use super::math::{deg_to_rad, normalize_angle, Vec2};
use super::render::Framebuffer;
use super::types::{Color, TextureTable};
use crate::config::ViewConfig;
use crate::world::{tiles, Grid};

/// A ray closer than this to an axis never crosses that axis' grid lines
const AXIS_EPSILON: f32 = 1e-6;

/// Nearest wall along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Euclidean distance from the ray origin
    pub distance: f32,
    pub code: i32,
    /// Position along the hit face, from the cell's low edge (0..cell_width)
    pub offset: f32,
    pub point: Vec2,
    /// Found by the vertical grid-line scan
    pub vertical: bool,
}

/// March along horizontal grid lines (constant y)
pub fn scan_horizontal(grid: &Grid, origin: Vec2, angle: f32) -> Option<WallHit> {
    let (sin, cos) = deg_to_rad(angle).sin_cos();
    if sin.abs() < AXIS_EPSILON {
        return None;
    }
    let cell = grid.cell_width();
    let tan = sin / cos;
    let down = sin > 0.0;
    // A ray starting exactly on a line moves a full cell, never zero
    let mut line = if down {
        (origin.y / cell).floor() + 1.0
    } else {
        (origin.y / cell).ceil() - 1.0
    };

    for _ in 0..grid.max_depth() {
        let point = Vec2::new(origin.x + (line * cell - origin.y) / tan, line * cell);
        let cx = grid.tile_coord(point.x);
        let cy = line as i32;

        let code = match grid.wall_at(cx, cy - 1) {
            tiles::NONE => grid.wall_at(cx, cy),
            back => back,
        };
        if code != tiles::NONE {
            return Some(WallHit {
                distance: origin.distance(point),
                code,
                offset: point.x - cx as f32 * cell,
                point,
                vertical: false,
            });
        }
        if grid.cell_index(cx, cy).is_none() {
            return None;
        }
        line += if down { 1.0 } else { -1.0 };
    }
    None
}

/// March along vertical grid lines (constant x)
pub fn scan_vertical(grid: &Grid, origin: Vec2, angle: f32) -> Option<WallHit> {
    let (sin, cos) = deg_to_rad(angle).sin_cos();
    if cos.abs() < AXIS_EPSILON {
        return None;
    }
    let cell = grid.cell_width();
    let tan = sin / cos;
    let right = cos > 0.0;
    let mut line = if right {
        (origin.x / cell).floor() + 1.0
    } else {
        (origin.x / cell).ceil() - 1.0
    };

    for _ in 0..grid.max_depth() {
        let point = Vec2::new(line * cell, origin.y + (line * cell - origin.x) * tan);
        let cx = line as i32;
        let cy = grid.tile_coord(point.y);

        let code = match grid.wall_at(cx - 1, cy) {
            tiles::NONE => grid.wall_at(cx, cy),
            back => back,
        };
        if code != tiles::NONE {
            return Some(WallHit {
                distance: origin.distance(point),
                code,
                offset: point.y - cy as f32 * cell,
                point,
                vertical: true,
            });
        }
        if grid.cell_index(cx, cy).is_none() {
            return None;
        }
        line += if right { 1.0 } else { -1.0 };
    }
    None
}

/// Nearest wall along `angle`. Equal distances go to the vertical scan.
pub fn cast_ray(grid: &Grid, origin: Vec2, angle: f32) -> Option<WallHit> {
    let horizontal = scan_horizontal(grid, origin, angle);
    let vertical = scan_vertical(grid, origin, angle);
    match (horizontal, vertical) {
        (Some(h), Some(v)) => Some(if v.distance <= h.distance { v } else { h }),
        (h, v) => v.or(h),
    }
}

/// Remove fish-eye: project the raw distance onto the view direction
pub fn corrected_distance(raw: f32, ray_angle: f32, view_angle: f32) -> f32 {
    raw * deg_to_rad(normalize_angle(view_angle - ray_angle)).cos()
}

/// Raw wall distance per ray column, rebuilt every frame
#[derive(Debug, Clone, Default)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    column_width: f32,
}

impl DepthBuffer {
    pub fn new(column_width: f32) -> Self {
        Self {
            depths: Vec::new(),
            column_width,
        }
    }

    pub fn clear(&mut self) {
        self.depths.clear();
    }

    pub fn push(&mut self, depth: f32) {
        self.depths.push(depth);
    }

    /// Depth of a column; missing columns are infinitely far
    pub fn get(&self, column: usize) -> f32 {
        self.depths.get(column).copied().unwrap_or(f32::INFINITY)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Ray column under a screen x, clamped to the valid range
    pub fn column_at(&self, screen_x: f32) -> Option<usize> {
        if self.depths.is_empty() || !(self.column_width > 0.0) || screen_x.is_nan() {
            return None;
        }
        let last = self.depths.len() - 1;
        let col = (screen_x / self.column_width).floor();
        Some(col.clamp(0.0, last as f32) as usize)
    }
}

/// Everything computed for one ray column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayColumn {
    pub angle: f32,
    pub hit: Option<WallHit>,
    /// Distance used for the strip height (INFINITY when nothing was hit)
    pub corrected: f32,
    pub strip_height: f32,
    pub screen_x: f32,
    pub width: f32,
}

impl RayColumn {
    /// Value recorded in the depth buffer
    pub fn raw_distance(&self) -> f32 {
        self.hit.map_or(f32::INFINITY, |h| h.distance)
    }

    pub fn strip_top(&self, screen_height: f32) -> f32 {
        screen_height / 2.0 - self.strip_height / 2.0
    }
}

/// Cast the ray for column `index`
pub fn cast_column(grid: &Grid, camera: &Camera, view: &ViewConfig, index: usize) -> RayColumn {
    let angle = normalize_angle(camera.first_ray_angle() + index as f32 * view.ray_step);
    let hit = cast_ray(grid, camera.position, angle);
    let corrected = hit.map_or(f32::INFINITY, |h| corrected_distance(h.distance, angle, camera.angle));
    let strip_height = if corrected > 0.0 && corrected.is_finite() {
        grid.cell_width() * view.screen_height as f32 / corrected
    } else {
        0.0
    };
    RayColumn {
        angle,
        hit,
        corrected,
        strip_height,
        screen_x: index as f32 * view.column_width(),
        width: view.column_width(),
    }
}

/// Cast every ray, draw walls, floors and ceilings, and rebuild `depth`
pub fn render_view(
    fb: &mut Framebuffer,
    grid: &Grid,
    camera: &Camera,
    textures: &TextureTable,
    view: &ViewConfig,
    depth: &mut DepthBuffer,
) {
    fb.clear_split(Color::SKY, Color::GROUND);
    depth.clear();
    depth.column_width = view.column_width();

    for i in 0..view.ray_count() {
        let column = cast_column(grid, camera, view, i);
        depth.push(column.raw_distance());
        draw_wall_strip(fb, textures, view, grid.cell_width(), &column);
        draw_floor_and_ceiling(fb, grid, camera, textures, view, &column);
    }
}

fn draw_wall_strip(fb: &mut Framebuffer, textures: &TextureTable, view: &ViewConfig, cell: f32, column: &RayColumn) {
    let Some(hit) = column.hit else { return };
    let Some(tex) = textures.get(hit.code) else { return };
    if view.wall_bands == 0 {
        return;
    }

    let band_height = column.strip_height / view.wall_bands as f32;
    let top = column.strip_top(view.screen_height as f32);
    let tx = (hit.offset / cell * tex.width as f32) as i32;
    for band in 0..view.wall_bands {
        let ty = (band * tex.height / view.wall_bands) as i32;
        if let Some(color) = tex.sample(tx, ty) {
            fb.fill_rect(column.screen_x, top + band as f32 * band_height, column.width, band_height, color);
        }
    }
}

fn draw_floor_and_ceiling(
    fb: &mut Framebuffer,
    grid: &Grid,
    camera: &Camera,
    textures: &TextureTable,
    view: &ViewConfig,
    column: &RayColumn,
) {
    let height = view.screen_height as f32;
    let horizon = height / 2.0;
    let fix = deg_to_rad(normalize_angle(camera.angle - column.angle)).cos();
    if fix <= 0.0 {
        return;
    }
    let (sin, cos) = deg_to_rad(column.angle).sin_cos();
    let tile = view.floor_tile_size;
    let origin = camera.position * view.floor_sample_scale;
    let step = column.width / 1.5;
    if !(step > 0.0) {
        return;
    }

    let mut y = (column.strip_top(height) + column.strip_height).max(horizon + 1.0);
    while y < height {
        let reach = view.floor_projection / (y - horizon) / fix;
        let sample = Vec2::new(origin.x + cos * reach, origin.y + sin * reach);
        let cell_x = (sample.x / tile).floor() as i32;
        let cell_y = (sample.y / tile).floor() as i32;

        let floor = grid.floor_at(cell_x, cell_y);
        if floor != tiles::NONE {
            fill_floor_texel(fb, textures, floor, sample, tile, column.screen_x, y, column.width);
        }
        let ceiling = grid.ceiling_at(cell_x, cell_y);
        if ceiling != tiles::NONE {
            fill_floor_texel(fb, textures, ceiling, sample, tile, column.screen_x, height - y, column.width);
        }
        y += step;
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_floor_texel(
    fb: &mut Framebuffer,
    textures: &TextureTable,
    code: i32,
    sample: Vec2,
    tile: f32,
    x: f32,
    y: f32,
    size: f32,
) {
    let Some(tex) = textures.get(code) else { return };
    let u = (sample.x.rem_euclid(tile) / tile * tex.width as f32) as i32;
    let v = (sample.y.rem_euclid(tile) / tile * tex.height as f32) as i32;
    if let Some(color) = tex.sample(u, v) {
        fb.fill_rect(x, y, size, size, color);
    }
}
