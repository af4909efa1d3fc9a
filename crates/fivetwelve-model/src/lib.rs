//! fivetwelve-model: the rules engine of a 512/2048-style sliding tile puzzle.
//!
//! This crate provides:
//! - A `Grid` of owned `Tile`s with the four directional moves (`shift`,
//!   `move_left`, ...), random `spawn`, and a value-sum `score`
//! - Change notifications (`events`) so a view can follow the grid without
//!   the grid knowing anything about it
//! - `GridConfig`, the construction parameters, loadable from TOML
//!
//! Quick start:
//! ```
//! use fivetwelve_model::engine::{Grid, Move};
//!
//! // Deterministic spawns with a seeded grid
//! let mut grid = Grid::with_seed(4, 4, 42);
//! grid.spawn(None).unwrap();
//! grid.spawn(None).unwrap();
//! let before = grid.score();
//!
//! // Moves never change the total; a changed board gets a new tile
//! let changed = grid.play(Move::Left).unwrap();
//! assert!(grid.score() >= before);
//! assert_eq!(changed, grid.score() > before);
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod events;

pub use config::GridConfig;
pub use engine::{Grid, Move, Tile, TileId, Vec2};
pub use error::{ConfigError, ModelError};
pub use events::{EventKind, GameEvent, Listener, Notifier, SharedListener, TileSnapshot};
