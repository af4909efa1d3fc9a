use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;
use serde::{Deserialize, Serialize};

use super::vec2::Vec2;
use crate::error::ModelError;
use crate::events::{EventKind, GameEvent, Notifier, TileSnapshot};

/// Process-unique identity of a tile, stable across moves and merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(1);

impl TileId {
    fn fresh() -> Self {
        TileId(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A numbered occupant of one grid cell.
///
/// `==` compares values only: two tiles are "equal" when they could merge,
/// regardless of where they sit or which tile is which. Use [`Tile::id`] for
/// identity.
pub struct Tile {
    id: TileId,
    pos: Vec2,
    value: u32,
}

impl Tile {
    pub fn new(pos: Vec2, value: u32) -> Self {
        Tile {
            id: TileId::fresh(),
            pos,
            value,
        }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            id: self.id,
            row: self.pos.x,
            col: self.pos.y,
            value: self.value,
        }
    }

    /// Record that this tile now sits at `new_pos` and announce it.
    ///
    /// The grid only hands out shared borrows of its tiles, so for a tile it
    /// owns this runs right after the tile changed cells.
    pub fn move_to(&mut self, new_pos: Vec2, notifier: &Notifier) {
        trace!("tile#{} {} -> {}", self.id.0, self.pos, new_pos);
        self.pos = new_pos;
        notifier.notify_all(&GameEvent::new(EventKind::Updated, self.snapshot()));
    }

    /// Whether a tile of `other` value could be absorbed into this one:
    /// equal values whose sum still fits a `u32`.
    #[inline]
    pub fn can_merge(&self, other: u32) -> bool {
        self.value == other && self.value.checked_add(other).is_some()
    }

    /// Absorb `other` into this tile.
    ///
    /// `other` is consumed: after the call it exists only as the `Removed`
    /// event that announced its end. Tiles of different value, or whose sum
    /// would not fit a `u32`, are refused and left untouched.
    ///
    /// ```
    /// use fivetwelve_model::engine::{Tile, Vec2};
    /// use fivetwelve_model::events::Notifier;
    ///
    /// let notifier = Notifier::new();
    /// let mut survivor = Tile::new(Vec2::new(0, 0), 4);
    /// survivor.merge(Tile::new(Vec2::new(0, 1), 4), &notifier).unwrap();
    /// assert_eq!(survivor.value(), 8);
    /// assert!(survivor.merge(Tile::new(Vec2::new(0, 1), 2), &notifier).is_err());
    /// ```
    pub fn merge(&mut self, other: Tile, notifier: &Notifier) -> Result<(), ModelError> {
        if self.value != other.value {
            return Err(ModelError::MergeMismatch {
                survivor: self.value,
                absorbed: other.value,
            });
        }
        if self.value.checked_add(other.value).is_none() {
            return Err(ModelError::ValueOverflow {
                survivor: self.value,
                absorbed: other.value,
            });
        }
        self.absorb(other, notifier);
        Ok(())
    }

    /// `merge` for callers that already checked [`Tile::can_merge`].
    pub(crate) fn absorb(&mut self, other: Tile, notifier: &Notifier) {
        debug_assert!(self.can_merge(other.value));
        self.value = self.value.wrapping_add(other.value);
        notifier.notify_all(&GameEvent::new(EventKind::Updated, self.snapshot()));
        notifier.notify_all(&GameEvent::new(EventKind::Removed, other.snapshot()));
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile[{},{}]:{}", self.pos.x, self.pos.y, self.value)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
