//! World module - tile grid and level files
//!
//! - `grid`: the three tile layers and all cell arithmetic
//! - `level`: binary map/entity loaders and level file naming

mod grid;
mod level;

pub use grid::*;
pub use level::*;
