use std::collections::HashSet;

use log::trace;
use rand::Rng;

use super::state::{Grid, Move};
use super::tile::TileId;
use super::vec2::Vec2;

/// Where a single slide left its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideOutcome {
    /// The starting cell held no tile.
    Empty,
    /// The tile was already blocked and did not move.
    Stayed(Vec2),
    /// The tile slid and came to rest at this cell.
    Moved(Vec2),
    /// The tile was absorbed by the tile in this cell.
    Merged(Vec2),
}

impl SlideOutcome {
    /// True if the grid changed.
    #[inline]
    pub fn changed(self) -> bool {
        matches!(self, SlideOutcome::Moved(_) | SlideOutcome::Merged(_))
    }
}

/// Tiles produced by a merge during the current move. They may not merge
/// again until the next move.
type MergeLocks = HashSet<TileId>;

/// Cells visited by a move toward `dir`, nearest the destination edge first.
///
/// Each line (a row for Left/Right, a column for Up/Down) is walked from the
/// edge the tiles travel toward, so every tile meets neighbours that have
/// already settled. Walking the other way would let a tile slide into a
/// cell that is then visited again as if freshly placed.
///
/// ```
/// use fivetwelve_model::engine::{traversal_order, Move, Vec2};
///
/// let order = traversal_order(Move::Right, 1, 3);
/// assert_eq!(order, vec![Vec2::new(0, 2), Vec2::new(0, 1), Vec2::new(0, 0)]);
/// ```
pub fn traversal_order(dir: Move, rows: usize, cols: usize) -> Vec<Vec2> {
    let row_seq: Vec<usize> = match dir {
        Move::Down => (0..rows).rev().collect(),
        _ => (0..rows).collect(),
    };
    let col_seq: Vec<usize> = match dir {
        Move::Right => (0..cols).rev().collect(),
        _ => (0..cols).collect(),
    };

    let mut order = Vec::with_capacity(rows * cols);
    match dir {
        Move::Left | Move::Right => {
            for &r in &row_seq {
                for &c in &col_seq {
                    order.push(Vec2::new(r as i32, c as i32));
                }
            }
        }
        Move::Up | Move::Down => {
            for &c in &col_seq {
                for &r in &row_seq {
                    order.push(Vec2::new(r as i32, c as i32));
                }
            }
        }
    }
    order
}

/// Slide/merge every tile toward `dir`. No randomness.
pub(crate) fn shift(grid: &mut Grid, dir: Move) -> bool {
    let step = dir.delta();
    let mut locks = MergeLocks::new();
    let mut changed = false;
    for pos in traversal_order(dir, grid.rows, grid.cols) {
        changed |= slide_locked(grid, pos, step, &mut locks).changed();
    }
    changed
}

/// A stand-alone slide: nothing is locked from earlier slides.
pub(crate) fn slide(grid: &mut Grid, pos: Vec2, dir: Vec2) -> SlideOutcome {
    slide_locked(grid, pos, dir, &mut MergeLocks::new())
}

enum Step {
    Slide,
    Merge,
    Blocked,
}

// `pos` is in bounds and `dir` is a unit step.
fn slide_locked(grid: &mut Grid, start: Vec2, dir: Vec2, locks: &mut MergeLocks) -> SlideOutcome {
    let (moving_id, moving_value) = match grid.cell(start) {
        Some(tile) => (tile.id(), tile.value()),
        None => return SlideOutcome::Empty,
    };

    let mut pos = start;
    loop {
        let candidate = pos + dir;
        if !grid.in_bounds(candidate) {
            break;
        }
        let step = match grid.cell(candidate) {
            None => Step::Slide,
            Some(target) if target.can_merge(moving_value) && !locks.contains(&target.id()) => {
                Step::Merge
            }
            Some(_) => Step::Blocked,
        };
        match step {
            Step::Slide => {
                grid.relocate(pos, candidate);
                pos = candidate;
            }
            Step::Merge => match grid.merge_cells(pos, candidate) {
                Some(survivor) => {
                    locks.insert(survivor);
                    return SlideOutcome::Merged(candidate);
                }
                None => break,
            },
            Step::Blocked => break,
        }
    }

    trace!("tile#{} slid {} -> {}", moving_id.0, start, pos);
    if pos == start {
        SlideOutcome::Stayed(pos)
    } else {
        SlideOutcome::Moved(pos)
    }
}

/// 2 nine times in ten, otherwise 4.
pub(crate) fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < 9 {
        2
    } else {
        4
    }
}

pub(crate) fn format_val(val: u32) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{x:^7}"),
    }
}
