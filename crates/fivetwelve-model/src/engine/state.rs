use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::ops::{self, SlideOutcome};
use super::tile::{Tile, TileId};
use super::vec2::Vec2;
use crate::config::GridConfig;
use crate::error::ModelError;
use crate::events::{EventKind, GameEvent, Listener, Notifier, SharedListener};

/// Side length of the grid when none is given.
pub const DEFAULT_SIZE: usize = 4;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The one-cell step a tile takes when moving this way.
    #[inline]
    pub fn delta(self) -> Vec2 {
        match self {
            Move::Up => Vec2::UP,
            Move::Down => Vec2::DOWN,
            Move::Left => Vec2::LEFT,
            Move::Right => Vec2::RIGHT,
        }
    }
}

/// The game grid: a fixed `rows x cols` array of optional tiles.
///
/// The grid owns every tile it holds. A tile's own `(row, col)` always names
/// the cell that stores it; every operation that moves or merges tiles
/// updates both together. Changes are reported to registered listeners as
/// [`GameEvent`]s, and all randomness comes from one seedable generator.
///
/// ```
/// use fivetwelve_model::engine::{Grid, Move};
///
/// let mut grid = Grid::with_seed(1, 4, 42);
/// grid.load_from_grid_of_values(&[vec![2, 0, 2, 4]]).unwrap();
/// assert!(grid.shift(Move::Left));
/// assert_eq!(grid.to_grid_of_values(), vec![vec![4, 4, 0, 0]]);
/// assert_eq!(grid.score(), 8);
/// ```
#[derive(Debug)]
pub struct Grid {
    pub(super) rows: usize,
    pub(super) cols: usize,
    pub(super) cells: Vec<Vec<Option<Tile>>>,
    pub(super) notifier: Notifier,
    rng: StdRng,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Grid {
    /// An empty grid with an entropy-seeded generator.
    ///
    /// Panics if either dimension is zero; see [`Grid::try_new`].
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Grid::build(rows, cols, StdRng::from_entropy())
    }

    /// An empty grid whose spawns are reproducible for a given `seed`.
    ///
    /// Panics if either dimension is zero.
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Grid::build(rows, cols, StdRng::seed_from_u64(seed))
    }

    pub fn try_new(rows: usize, cols: usize) -> Result<Self, ModelError> {
        Grid::try_with_rng(rows, cols, StdRng::from_entropy())
    }

    pub fn try_with_rng(rows: usize, cols: usize, rng: StdRng) -> Result<Self, ModelError> {
        if rows == 0 || cols == 0 {
            return Err(ModelError::EmptyGrid { rows, cols });
        }
        Ok(Grid::build(rows, cols, rng))
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, ModelError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Grid::try_with_rng(config.rows, config.cols, rng)
    }

    /// A grid shaped like `values` and holding its tiles (0 = empty).
    pub fn from_values(values: &[Vec<u32>]) -> Result<Self, ModelError> {
        let rows = values.len();
        let cols = values.first().map_or(0, Vec::len);
        let mut grid = Grid::try_new(rows, cols)?;
        grid.load_from_grid_of_values(values)?;
        Ok(grid)
    }

    fn build(rows: usize, cols: usize, rng: StdRng) -> Self {
        Grid {
            rows,
            cols,
            cells: empty_cells(rows, cols),
            notifier: Notifier::new(),
            rng,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Subscribe to tile changes. Returns `false` if already subscribed.
    pub fn add_listener<L: Listener + 'static>(&mut self, listener: Rc<RefCell<L>>) -> bool {
        self.notifier.add_listener(listener)
    }

    pub fn add_shared_listener(&mut self, listener: SharedListener) -> bool {
        self.notifier.add_shared(listener)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0 && (pos.x as usize) < self.rows && pos.y >= 0 && (pos.y as usize) < self.cols
    }

    fn check_bounds(&self, pos: Vec2) -> Result<(), ModelError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(ModelError::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// The tile at `pos`, if any.
    pub fn get(&self, pos: Vec2) -> Result<Option<&Tile>, ModelError> {
        self.check_bounds(pos)?;
        Ok(self.cell(pos).as_ref())
    }

    /// Store `tile` (or nothing) at `pos`, returning the previous occupant.
    ///
    /// This is a raw storage write: no events fire. The tile must already
    /// carry `pos` as its coordinates.
    pub fn set(&mut self, pos: Vec2, tile: Option<Tile>) -> Result<Option<Tile>, ModelError> {
        self.check_bounds(pos)?;
        if let Some(t) = &tile {
            if t.pos() != pos {
                return Err(ModelError::Misplaced {
                    tile: t.pos(),
                    cell: pos,
                });
            }
        }
        Ok(std::mem::replace(self.cell_mut(pos), tile))
    }

    // Callers check bounds first; indexing panics otherwise.
    #[inline]
    pub(super) fn cell(&self, pos: Vec2) -> &Option<Tile> {
        &self.cells[pos.x as usize][pos.y as usize]
    }

    #[inline]
    pub(super) fn cell_mut(&mut self, pos: Vec2) -> &mut Option<Tile> {
        &mut self.cells[pos.x as usize][pos.y as usize]
    }

    /// Move the tile at `from` into the empty cell `to`, storage first, then
    /// the tile's own coordinates.
    pub(super) fn relocate(&mut self, from: Vec2, to: Vec2) {
        let tile = self.cell_mut(from).take();
        *self.cell_mut(to) = tile;
        let (r, c) = (to.x as usize, to.y as usize);
        if let Some(tile) = self.cells[r][c].as_mut() {
            tile.move_to(to, &self.notifier);
        }
    }

    /// Take the tile out of `from` and merge it into the tile at `into`,
    /// which keeps its cell. Returns the survivor's id, or `None` with the
    /// grid untouched unless both cells hold tiles that can merge.
    pub(super) fn merge_cells(&mut self, from: Vec2, into: Vec2) -> Option<TileId> {
        let mergeable = match (self.cell(from), self.cell(into)) {
            (Some(moving), Some(target)) => target.can_merge(moving.value()),
            _ => false,
        };
        debug_assert!(mergeable, "merge_cells({from}, {into}) on a non-mergeable pair");
        if !mergeable {
            return None;
        }
        let absorbed = self.cell_mut(from).take()?;
        let (r, c) = (into.x as usize, into.y as usize);
        let survivor = self.cells[r][c].as_mut()?;
        debug!(
            "merge tile#{} into tile#{} at {}: {} + {}",
            absorbed.id().0,
            survivor.id().0,
            into,
            survivor.value(),
            absorbed.value()
        );
        survivor.absorb(absorbed, &self.notifier);
        Some(survivor.id())
    }

    /// Occupied tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten().flatten()
    }

    /// Coordinates holding no tile, in row-major order.
    pub fn empty_positions(&self) -> Vec<Vec2> {
        let mut empties = Vec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_none() {
                    empties.push(Vec2::new(r as i32, c as i32));
                }
            }
        }
        empties
    }

    pub fn has_empty(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_none)
    }

    /// Place a new tile on a uniformly chosen empty cell and return where.
    ///
    /// Without an explicit `value` the tile is a 4 one time in ten and a 2
    /// otherwise.
    ///
    /// ```
    /// use fivetwelve_model::engine::Grid;
    /// use fivetwelve_model::error::ModelError;
    ///
    /// let mut grid = Grid::with_seed(1, 2, 9);
    /// grid.spawn(None).unwrap();
    /// grid.spawn(Some(8)).unwrap();
    /// assert_eq!(grid.spawn(None), Err(ModelError::GridFull));
    /// ```
    pub fn spawn(&mut self, value: Option<u32>) -> Result<Vec2, ModelError> {
        if value == Some(0) {
            return Err(ModelError::InvalidValue);
        }
        let empties = self.empty_positions();
        if empties.is_empty() {
            return Err(ModelError::GridFull);
        }
        let pos = empties[self.rng.gen_range(0..empties.len())];
        let value = value.unwrap_or_else(|| ops::random_tile_value(&mut self.rng));

        let tile = Tile::new(pos, value);
        let snapshot = tile.snapshot();
        *self.cell_mut(pos) = Some(tile);
        debug!("spawned tile#{} = {} at {}", snapshot.id.0, value, pos);
        self.notifier
            .notify_all(&GameEvent::new(EventKind::Created, snapshot));
        Ok(pos)
    }

    /// Slide the tile at `pos` one cell at a time along `dir` until it hits
    /// the edge, a tile of different value, or merges with an equal one.
    pub fn slide(&mut self, pos: Vec2, dir: Vec2) -> Result<SlideOutcome, ModelError> {
        self.check_bounds(pos)?;
        if !dir.is_unit() {
            return Err(ModelError::NotUnitDirection(dir));
        }
        Ok(ops::slide(self, pos, dir))
    }

    /// Slide every tile toward `dir` without spawning. Returns whether any
    /// tile moved or merged.
    pub fn shift(&mut self, dir: Move) -> bool {
        ops::shift(self, dir)
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(Move::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(Move::Right)
    }

    pub fn move_up(&mut self) -> bool {
        self.shift(Move::Up)
    }

    pub fn move_down(&mut self) -> bool {
        self.shift(Move::Down)
    }

    /// Perform a move, then spawn a random tile if the move changed anything.
    pub fn play(&mut self, dir: Move) -> Result<bool, ModelError> {
        let changed = self.shift(dir);
        if changed {
            self.spawn(None)?;
        }
        Ok(changed)
    }

    /// True if no move in any direction can change the grid.
    pub fn is_game_over(&self) -> bool {
        if self.has_empty() {
            return false;
        }
        for tile in self.tiles() {
            for step in [Vec2::RIGHT, Vec2::DOWN] {
                let next = tile.pos() + step;
                let neighbour = self.in_bounds(next).then(|| self.cell(next).as_ref()).flatten();
                if neighbour.is_some_and(|n| n.can_merge(tile.value())) {
                    return false;
                }
            }
        }
        true
    }

    /// Sum of all tile values. Moves conserve it; only spawns raise it.
    pub fn score(&self) -> u64 {
        self.tiles().map(|t| u64::from(t.value())).sum()
    }

    /// Highest tile value present, 0 on an empty grid.
    pub fn highest_tile(&self) -> u32 {
        self.tiles().map(Tile::value).max().unwrap_or(0)
    }

    /// Plain values, row-major, 0 for empty cells.
    pub fn to_grid_of_values(&self) -> Vec<Vec<u32>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_ref().map_or(0, Tile::value)).collect())
            .collect()
    }

    /// Replace every tile with the layout in `values` (0 = empty).
    ///
    /// Listeners see a `Removed` event for each discarded tile followed by a
    /// `Created` event for each loaded one. A mis-shaped array is refused
    /// before anything changes.
    pub fn load_from_grid_of_values(&mut self, values: &[Vec<u32>]) -> Result<(), ModelError> {
        let bad_row = values.iter().position(|row| row.len() != self.cols);
        if values.len() != self.rows || bad_row.is_some() {
            return Err(ModelError::ShapeMismatch {
                rows: self.rows,
                cols: self.cols,
                got_rows: values.len(),
                bad_row,
            });
        }

        let old = std::mem::replace(&mut self.cells, empty_cells(self.rows, self.cols));
        for tile in old.into_iter().flatten().flatten() {
            self.notifier
                .notify_all(&GameEvent::new(EventKind::Removed, tile.snapshot()));
        }

        for (r, row) in values.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let tile = Tile::new(Vec2::new(r as i32, c as i32), value);
                let snapshot = tile.snapshot();
                self.cells[r][c] = Some(tile);
                self.notifier
                    .notify_all(&GameEvent::new(EventKind::Created, snapshot));
            }
        }
        Ok(())
    }
}

fn empty_cells(rows: usize, cols: usize) -> Vec<Vec<Option<Tile>>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| None).collect())
        .collect()
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.cols * 8 - 1);
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|c| ops::format_val(c.as_ref().map_or(0, Tile::value)))
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}
