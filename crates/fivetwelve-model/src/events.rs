//! Change notifications from the model to whoever is watching it.
//!
//! The grid and its tiles never know what a subscriber is. They describe each
//! change as a [`GameEvent`] and hand it to a [`Notifier`], which delivers it
//! synchronously, in registration order, to every registered [`Listener`].
//! Any `FnMut(&GameEvent)` closure is a listener.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use fivetwelve_model::engine::Grid;
//! use fivetwelve_model::events::{EventKind, GameEvent};
//!
//! let seen: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
//! let sink = Rc::clone(&seen);
//! let mut grid = Grid::with_seed(4, 4, 7);
//! grid.add_listener(Rc::new(RefCell::new(move |e: &GameEvent| sink.borrow_mut().push(*e))));
//! grid.spawn(Some(2)).unwrap();
//! assert_eq!(seen.borrow()[0].kind, EventKind::Created);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::TileId;

/// What happened to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Updated,
    Removed,
}

/// The affected tile as it was when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub row: i32,
    pub col: i32,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub tile: TileSnapshot,
}

impl GameEvent {
    #[inline]
    pub fn new(kind: EventKind, tile: TileSnapshot) -> Self {
        GameEvent { kind, tile }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} tile#{} at ({}, {}) = {}",
            self.kind, self.tile.id.0, self.tile.row, self.tile.col, self.tile.value
        )
    }
}

/// Anything that wants to hear about model changes.
pub trait Listener {
    fn notify(&mut self, event: &GameEvent);
}

impl<F> Listener for F
where
    F: FnMut(&GameEvent),
{
    #[inline]
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

pub type SharedListener = Rc<RefCell<dyn Listener>>;

/// Ordered registry of listeners.
///
/// Identity of a listener is the identity of its `Rc` allocation, so
/// registering a clone of an already registered `Rc` is a no-op.
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<SharedListener>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Returns `false` if it was already registered.
    pub fn add_listener<L: Listener + 'static>(&mut self, listener: Rc<RefCell<L>>) -> bool {
        self.add_shared(listener)
    }

    /// [`Notifier::add_listener`] for a listener already behind
    /// `Rc<RefCell<dyn Listener>>`.
    pub fn add_shared(&mut self, listener: SharedListener) -> bool {
        if self.listeners.iter().any(|l| same_allocation(l, &listener)) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Deliver `event` to every listener, in registration order.
    ///
    /// A panicking listener unwinds straight through the caller; nothing is
    /// caught here.
    pub fn notify_all(&self, event: &GameEvent) {
        for listener in &self.listeners {
            listener.borrow_mut().notify(event);
        }
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn same_allocation(a: &SharedListener, b: &SharedListener) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, value: u32) -> GameEvent {
        GameEvent::new(
            kind,
            TileSnapshot {
                id: TileId(1),
                row: 0,
                col: 0,
                value,
            },
        )
    }

    struct Recorder {
        tag: &'static str,
        log: Rc<RefCell<Vec<(&'static str, EventKind)>>>,
    }

    impl Listener for Recorder {
        fn notify(&mut self, event: &GameEvent) {
            self.log.borrow_mut().push((self.tag, event.kind));
        }
    }

    #[test]
    fn it_delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        for tag in ["first", "second", "third"] {
            let added = notifier.add_listener(Rc::new(RefCell::new(Recorder {
                tag,
                log: Rc::clone(&log),
            })));
            assert!(added);
        }

        notifier.notify_all(&event(EventKind::Created, 2));
        notifier.notify_all(&event(EventKind::Removed, 2));

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", EventKind::Created),
                ("second", EventKind::Created),
                ("third", EventKind::Created),
                ("first", EventKind::Removed),
                ("second", EventKind::Removed),
                ("third", EventKind::Removed),
            ]
        );
    }

    #[test]
    fn it_ignores_duplicate_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::new(RefCell::new(Recorder {
            tag: "only",
            log: Rc::clone(&log),
        }));
        let mut notifier = Notifier::new();
        assert!(notifier.add_listener(Rc::clone(&recorder)));
        assert!(!notifier.add_listener(Rc::clone(&recorder)));
        assert_eq!(notifier.listener_count(), 1);

        notifier.notify_all(&event(EventKind::Updated, 4));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn it_registers_erased_listeners_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::new(RefCell::new(Recorder {
            tag: "erased",
            log: Rc::clone(&log),
        }));
        let erased: SharedListener = recorder.clone();
        let mut notifier = Notifier::new();
        assert!(notifier.add_shared(Rc::clone(&erased)));
        assert!(!notifier.add_shared(erased));
        assert!(!notifier.add_listener(recorder));
        assert_eq!(notifier.listener_count(), 1);

        notifier.notify_all(&event(EventKind::Created, 2));
        assert_eq!(*log.borrow(), vec![("erased", EventKind::Created)]);
    }

    #[test]
    fn it_propagates_listener_panics() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.add_listener(Rc::new(RefCell::new(Recorder {
            tag: "before",
            log: Rc::clone(&log),
        })));
        notifier.add_listener(Rc::new(RefCell::new(|_: &GameEvent| {
            panic!("listener failed")
        })));
        notifier.add_listener(Rc::new(RefCell::new(Recorder {
            tag: "after",
            log: Rc::clone(&log),
        })));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            notifier.notify_all(&event(EventKind::Updated, 4))
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"listener failed"));
        assert_eq!(*log.borrow(), vec![("before", EventKind::Updated)]);
    }

    #[test]
    fn it_accepts_closures() {
        let total = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&total);
        let mut notifier = Notifier::new();
        notifier.add_listener(Rc::new(RefCell::new(move |e: &GameEvent| {
            *sink.borrow_mut() += e.tile.value;
        })));
        notifier.notify_all(&event(EventKind::Updated, 8));
        notifier.notify_all(&event(EventKind::Updated, 16));
        assert_eq!(*total.borrow(), 24);
    }

    #[test]
    fn it_notifies_nobody_without_listeners() {
        let notifier = Notifier::new();
        notifier.notify_all(&event(EventKind::Created, 2));
        assert_eq!(notifier.listener_count(), 0);
    }
}
