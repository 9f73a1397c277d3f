//! Software raycasting renderer
//!
//! Everything is drawn into an RGBA [`Framebuffer`] that the platform layer
//! uploads once per frame.
//!
//! # Module Organization
//!
//! - `types` - Color, Texture, TextureTable
//! - `math` - Vec2 and angle helpers
//! - `camera` - Player camera (position, heading, FOV)
//! - `render` - Framebuffer and rectangle fills
//! - `raycast` - Wall/floor/ceiling ray casting and the per-column depth buffer
//! - `sprite` - Billboard sprite projection with depth-buffer occlusion

pub mod camera;
pub mod math;
pub mod raycast;
pub mod render;
pub mod sprite;
pub mod types;

pub use camera::Camera;
pub use math::Vec2;
pub use raycast::{render_view, DepthBuffer};
pub use render::Framebuffer;
pub use sprite::{draw_sprite, Billboard};
pub use types::{Color, Texture, TextureTable};
