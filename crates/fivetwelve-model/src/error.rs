use thiserror::Error;

use crate::engine::Vec2;

/// Precondition violations reported by the model.
///
/// These are caller mistakes. The model never clamps a coordinate or drops a
/// request to avoid one; it refuses and says why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("position {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds { pos: Vec2, rows: usize, cols: usize },
    #[error("grid is full; no empty cell to spawn into")]
    GridFull,
    #[error("cannot merge tiles of unequal value ({survivor} and {absorbed})")]
    MergeMismatch { survivor: u32, absorbed: u32 },
    #[error("merging {survivor} and {absorbed} would overflow a tile value")]
    ValueOverflow { survivor: u32, absorbed: u32 },
    #[error("direction {0} is not a unit step")]
    NotUnitDirection(Vec2),
    #[error("tile at {tile} cannot be stored in cell {cell}")]
    Misplaced { tile: Vec2, cell: Vec2 },
    #[error(
        "expected a {rows}x{cols} grid of values, got {got_rows} rows \
         (first mismatched row: {bad_row:?})"
    )]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        got_rows: usize,
        bad_row: Option<usize>,
    },
    #[error("tile value must be positive")]
    InvalidValue,
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
}

/// Problems loading a [`GridConfig`](crate::config::GridConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
