use log::debug;

use fivetwelve_model::{EventKind, GameEvent, Listener};

/// Counts model events by kind and echoes each one at debug level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventTally {
    pub created: u64,
    pub updated: u64,
    pub removed: u64,
}

impl EventTally {
    /// Tiles that were created and not yet removed.
    pub fn live_tiles(&self) -> u64 {
        self.created - self.removed
    }
}

impl Listener for EventTally {
    fn notify(&mut self, event: &GameEvent) {
        debug!("{event}");
        match event.kind {
            EventKind::Created => self.created += 1,
            EventKind::Updated => self.updated += 1,
            EventKind::Removed => self.removed += 1,
        }
    }
}
