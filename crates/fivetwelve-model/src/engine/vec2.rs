use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An `(x, y)` pair of offsets along two orthogonal axes.
///
/// Read as a position it is `(row, col)` measured from the top-left cell;
/// read as a movement it is the step from one cell to the next. Adding a
/// direction to a position yields the neighbouring position. No bounds are
/// checked here, that belongs to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    /// One row toward the top edge.
    pub const UP: Vec2 = Vec2 { x: -1, y: 0 };
    /// One row toward the bottom edge.
    pub const DOWN: Vec2 = Vec2 { x: 1, y: 0 };
    /// One column toward the left edge.
    pub const LEFT: Vec2 = Vec2 { x: 0, y: -1 };
    /// One column toward the right edge.
    pub const RIGHT: Vec2 = Vec2 { x: 0, y: 1 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Vec2 { x, y }
    }

    /// True for the four axis-aligned unit steps and nothing else.
    #[inline]
    pub fn is_unit(self) -> bool {
        self.x.abs() + self.y.abs() == 1
    }
}

/// Componentwise sum. Wraps on `i32` overflow rather than panicking.
impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.wrapping_add(other.x), self.y.wrapping_add(other.y))
    }
}

impl From<(i32, i32)> for Vec2 {
    fn from((x, y): (i32, i32)) -> Self {
        Vec2::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
