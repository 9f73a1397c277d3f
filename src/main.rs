//! Bank Robbery: a grid raycasting first-person shooter
//!
//! The 3D view is software rendered:
//! - One ray per column, DDA-style grid-line stepping
//! - Textured wall strips, projected floor and ceiling decals
//! - Billboard sprites occluded through a per-column depth buffer
//! - macroquad only uploads the finished frame and draws the HUD

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod audio;
mod config;
mod game;
mod input;
mod progress;
mod rasterizer;
mod world;

use std::path::Path;

use macroquad::prelude::*;

use app::AppState;
use audio::KiraAudio;
use input::InputState;
use rasterizer::TextureTable;

/// Settings file read at startup
const CONFIG_PATH: &str = "config.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Bank Robbery v{}", VERSION),
        window_width: 1024,
        window_height: 512,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load_or_default(CONFIG_PATH);
    let progress = progress::load_or_default(&config.save_path);

    let textures = TextureTable::load_directory(&config.texture_dir);
    log::info!("{}/{} textures loaded", textures.loaded_count(), textures.len());
    let mut audio = KiraAudio::load(Path::new(&config.sound_dir));

    let input = InputState::new();
    let mut app = AppState::new(config, progress);

    log::info!("=== Bank Robbery v{} ===", VERSION);
    log::info!("frame limit: {}", app.config.fps_limit.label());

    loop {
        let frame_start = get_time();
        let snapshot = input.poll();

        app.update(&snapshot, get_frame_time(), frame_start, &textures, &mut audio);
        app.draw();

        if let Some(target_frame_time) = app.frame_time() {
            let elapsed = get_time() - frame_start;
            let remaining = target_frame_time - elapsed;

            if remaining > 0.0 {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: just spin-wait (no thread::sleep available)
                #[cfg(target_arch = "wasm32")]
                {
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
            }
        }

        next_frame().await;
    }
}
