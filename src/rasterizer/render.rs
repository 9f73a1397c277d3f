//! Framebuffer for software rendering
//!
//! The whole 3D view is drawn as filled axis-aligned rectangles: wall bands,
//! floor cells and sprite texel blocks. Rectangles use float coordinates and
//! are clipped to the buffer.

use super::types::Color;

pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Sky above the horizon, ground below it
    pub fn clear_split(&mut self, top: Color, bottom: Color) {
        let half = self.height / 2;
        let row_bytes = self.width * 4;
        let (upper, lower) = self.pixels.split_at_mut(half * row_bytes);
        let top = top.to_bytes();
        let bottom = bottom.to_bytes();
        for px in upper.chunks_exact_mut(4) {
            px.copy_from_slice(&top);
        }
        for px in lower.chunks_exact_mut(4) {
            px.copy_from_slice(&bottom);
        }
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::with_alpha(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    /// Fill a rectangle covering every pixel it touches. Returns the number of
    /// pixels written after clipping.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> usize {
        if !(w > 0.0 && h > 0.0) || !x.is_finite() || !y.is_finite() {
            return 0;
        }
        let x0 = x.floor().max(0.0);
        let y0 = y.floor().max(0.0);
        let x1 = (x + w).ceil().min(self.width as f32);
        let y1 = (y + h).ceil().min(self.height as f32);
        if x1 <= x0 || y1 <= y0 {
            return 0;
        }
        let (x0, x1) = (x0 as usize, x1 as usize);
        let (y0, y1) = (y0 as usize, y1 as usize);

        let bytes = color.to_bytes();
        for row in y0..y1 {
            let start = (row * self.width + x0) * 4;
            let end = (row * self.width + x1) * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
        (x1 - x0) * (y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new(8, 4);
        let written = fb.fill_rect(6.5, -2.0, 10.0, 3.0, Color::WHITE);
        // columns 6..8, rows 0..1
        assert_eq!(written, 2);
        assert_eq!(fb.get_pixel(7, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(7, 1), Some(Color::with_alpha(0, 0, 0, 0)));
    }

    #[test]
    fn test_fill_rect_degenerate() {
        let mut fb = Framebuffer::new(8, 4);
        assert_eq!(fb.fill_rect(1.0, 1.0, 0.0, 2.0, Color::WHITE), 0);
        assert_eq!(fb.fill_rect(f32::NAN, 1.0, 2.0, 2.0, Color::WHITE), 0);
        assert_eq!(fb.fill_rect(20.0, 1.0, 2.0, 2.0, Color::WHITE), 0);
    }

    #[test]
    fn test_clear_split() {
        let mut fb = Framebuffer::new(2, 4);
        fb.clear_split(Color::SKY, Color::GROUND);
        assert_eq!(fb.get_pixel(0, 1), Some(Color::SKY));
        assert_eq!(fb.get_pixel(1, 2), Some(Color::GROUND));
    }
}
