//! Input handling
//!
//! Action-based keyboard and mouse input. The platform is polled once per
//! frame; everything downstream reads the resulting snapshot.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
