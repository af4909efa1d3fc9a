//! Engine module: the grid, its tiles, and the slide/merge rules.
//!
//! - `Grid` owns the tiles and is the type callers drive.
//! - `Tile` and `Vec2` are the pieces it is built from.
//! - The slide algorithm and per-direction traversal live in `ops`.

mod ops;
pub mod state;
mod tile;
mod vec2;

pub use ops::{traversal_order, SlideOutcome};
pub use state::{Grid, Move, DEFAULT_SIZE};
pub use tile::{Tile, TileId};
pub use vec2::Vec2;
