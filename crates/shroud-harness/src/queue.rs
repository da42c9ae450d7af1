//! Recording event queue with synchronous dispatch.
//!
//! Implements the core's [`EventQueue`] capability over a single shared
//! state cell, counting every registration call so lifecycle tests can
//! assert the exact take-over/release protocol. Posted events queue up
//! until [`RecordingQueue::run`] drains them, which keeps delivery
//! deterministic and re-entrancy (handlers posting further events) safe.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use shroud_core::{Event, EventHandler, EventQueue, EventTarget};

/// Invocation counters for the queue's registration surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueCounts {
    /// `adopt_handler` invocations
    pub adopted: usize,
    /// `remove_handler` invocations
    pub removed: usize,
    /// `remove_handlers` invocations
    pub removed_all: usize,
    /// `post` invocations
    pub posted: usize,
}

#[derive(Default)]
struct QueueState {
    handlers: HashMap<u64, Rc<RefCell<EventHandler>>>,
    pending: VecDeque<Event>,
    counts: QueueCounts,
}

/// A shared, single-threaded event queue double.
///
/// Clones are handles onto the same queue.
#[derive(Clone, Default)]
pub struct RecordingQueue {
    state: Rc<RefCell<QueueState>>,
}

impl RecordingQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the invocation counters.
    #[must_use]
    pub fn counts(&self) -> QueueCounts {
        self.state.borrow().counts
    }

    /// Whether a handler is currently registered for `target`.
    #[must_use]
    pub fn has_handler(&self, target: EventTarget) -> bool {
        self.state.borrow().handlers.contains_key(&target.id())
    }

    /// Deliver queued events until none remain; returns how many were
    /// delivered to a handler. Events for targets without a handler are
    /// dropped, as a real queue would after unregistration.
    pub fn run(&self) -> usize {
        let mut delivered = 0;

        loop {
            let Some(event) = self.state.borrow_mut().pending.pop_front() else {
                break;
            };

            // Clone the handler cell out so the state borrow is released
            // before user code runs (it may post or unregister).
            let handler = self.state.borrow().handlers.get(&event.target.id()).map(Rc::clone);

            if let Some(handler) = handler {
                (handler.borrow_mut())(event.event);
                delivered += 1;
            }
        }

        delivered
    }
}

impl EventQueue for RecordingQueue {
    fn adopt_handler(&self, target: EventTarget, handler: EventHandler) {
        let mut state = self.state.borrow_mut();
        state.counts.adopted += 1;
        state.handlers.insert(target.id(), Rc::new(RefCell::new(handler)));
    }

    fn remove_handler(&self, target: EventTarget) {
        let mut state = self.state.borrow_mut();
        state.counts.removed += 1;
        state.handlers.remove(&target.id());
    }

    fn remove_handlers(&self, target: EventTarget) {
        let mut state = self.state.borrow_mut();
        state.counts.removed_all += 1;
        state.handlers.remove(&target.id());
    }

    fn post(&self, event: Event) {
        let mut state = self.state.borrow_mut();
        state.counts.posted += 1;
        state.pending.push_back(event);
    }
}
