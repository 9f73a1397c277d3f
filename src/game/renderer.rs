//! Screen output
//!
//! Uploads the software framebuffer as one texture per frame and draws the
//! HUD and menu screens on top with macroquad. Nothing here touches game
//! state.

use macroquad::prelude::*;

use super::runtime::GameRuntime;
use crate::rasterizer::Framebuffer;

/// Screen-space rectangle the frame is scaled into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    /// Largest rectangle with the framebuffer's aspect ratio that fits the
    /// window, centred (letterboxed)
    pub fn fit(fb_width: usize, fb_height: usize, screen_w: f32, screen_h: f32) -> Self {
        if fb_width == 0 || fb_height == 0 || screen_h <= 0.0 {
            return Self { x: 0.0, y: 0.0, w: screen_w, h: screen_h };
        }
        let fb_aspect = fb_width as f32 / fb_height as f32;
        let screen_aspect = screen_w / screen_h;
        if fb_aspect > screen_aspect {
            let h = screen_w / fb_aspect;
            Self { x: 0.0, y: (screen_h - h) * 0.5, w: screen_w, h }
        } else {
            let w = screen_h * fb_aspect;
            Self { x: (screen_w - w) * 0.5, y: 0.0, w, h: screen_h }
        }
    }

    /// Scale from framebuffer pixels to screen pixels
    pub fn scale(&self, fb_width: usize) -> f32 {
        if fb_width == 0 {
            1.0
        } else {
            self.w / fb_width as f32
        }
    }
}

/// Draw the framebuffer letterboxed into the window
pub fn present(fb: &Framebuffer) -> Viewport {
    let view = Viewport::fit(fb.width, fb.height, screen_width(), screen_height());

    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::from_rgba(10, 10, 12, 255));
    draw_texture_ex(
        &texture,
        view.x,
        view.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(view.w, view.h)),
            ..Default::default()
        },
    );
    view
}

/// Health, money, crosshair and the boss bar
pub fn draw_hud(runtime: &GameRuntime, view: Viewport) {
    let world = &runtime.world;
    let s = view.scale(runtime.fb.width);
    let size = 24.0 * s;

    draw_text(
        &format!("Health: {}", world.stats.health.max(0)),
        view.x + 16.0 * s,
        view.y + 32.0 * s,
        size,
        WHITE,
    );

    let money = format!("Money: {}", world.stats.level_money + world.progress.money);
    let dims = measure_text(&money, None, size as u16, 1.0);
    draw_text(&money, view.x + view.w - dims.width - 16.0 * s, view.y + 32.0 * s, size, WHITE);

    let inventory = format!(
        "{}  Keys: {}  Bombs: {}",
        world.armory.selected.label(),
        world.stats.keys,
        world.stats.bombs
    );
    draw_text(&inventory, view.x + 16.0 * s, view.y + view.h - 16.0 * s, 18.0 * s, LIGHTGRAY);

    let (cx, cy) = (view.x + view.w / 2.0, view.y + view.h / 2.0);
    let arm = 8.0 * s;
    draw_line(cx - arm, cy, cx + arm, cy, 2.0, WHITE);
    draw_line(cx, cy - arm, cx, cy + arm, 2.0, WHITE);

    if world.config.show_frame_stats {
        let stats = format!(
            "{}  sprites {}",
            runtime.timings.summary(),
            runtime.last_pass.sprites_drawn
        );
        draw_text(&stats, view.x + 16.0 * s, view.y + 56.0 * s, 16.0 * s, YELLOW);
    }

    if let Some(fraction) = runtime.boss_health() {
        let w = view.w * 0.5;
        let x = view.x + (view.w - w) / 2.0;
        let y = view.y + 48.0 * s;
        let h = 12.0 * s;
        draw_rectangle(x, y, w, h, Color::from_rgba(40, 0, 0, 200));
        draw_rectangle(x, y, w * fraction.clamp(0.0, 1.0), h, Color::from_rgba(220, 30, 30, 255));
        draw_rectangle_lines(x, y, w, h, 2.0, Color::from_rgba(200, 200, 210, 255));
    }
}

/// Baseline of the first menu line and the distance between lines
pub const MENU_TOP: f32 = 130.0;
pub const MENU_SPACING: f32 = 30.0;

/// Menu line under a pointer y coordinate
pub fn menu_line_at(y: f32, count: usize) -> Option<usize> {
    let offset = y - (MENU_TOP - MENU_SPACING * 0.75);
    if offset < 0.0 {
        return None;
    }
    let line = (offset / MENU_SPACING) as usize;
    (line < count).then_some(line)
}

/// One line of a menu screen
pub struct MenuLine {
    pub text: String,
    /// Greyed out (locked level, unaffordable item)
    pub dimmed: bool,
}

/// Title, a list with one highlighted entry, and a footer hint
pub fn draw_menu(title: &str, lines: &[MenuLine], selected: usize, footer: &str) {
    clear_background(Color::from_rgba(20, 22, 28, 255));
    let w = screen_width();

    let title_dims = measure_text(title, None, 40, 1.0);
    draw_text(title, (w - title_dims.width) / 2.0, 70.0, 40.0, Color::from_rgba(230, 200, 60, 255));

    for (i, line) in lines.iter().enumerate() {
        let y = MENU_TOP + i as f32 * MENU_SPACING;
        let color = if i == selected {
            Color::from_rgba(100, 180, 255, 255)
        } else if line.dimmed {
            Color::from_rgba(90, 90, 100, 255)
        } else {
            Color::from_rgba(200, 200, 210, 255)
        };
        let marker = if i == selected { "> " } else { "  " };
        draw_text(&format!("{}{}", marker, line.text), 80.0, y, 24.0, color);
    }

    let dims = measure_text(footer, None, 16, 1.0);
    draw_text(
        footer,
        (w - dims.width) / 2.0,
        screen_height() - 24.0,
        16.0,
        Color::from_rgba(100, 100, 110, 200),
    );
}
