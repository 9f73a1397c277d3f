//! Gameplay
//!
//! Everything between input and pixels: the session world, the entity model
//! and its per-kind behaviours, player control, and the frame driver.
//!
//! Key pieces:
//! - [`GameWorld`]: grid, entities, camera, counters, clock and rng for one run
//! - [`entity::Entity`]: a tagged union of every kind the level files can place
//! - [`GameRuntime`]: runs one frame in the fixed input, walls, entities order
//! - Events: gameplay reports what happened through queues, not callbacks

pub mod boss;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod renderer;
pub mod runtime;
pub mod simulation;
pub mod trap;
pub mod weapon;
pub mod world;

pub use runtime::{FpsLimit, FrameOutcome, GameRuntime};
pub use world::GameWorld;
