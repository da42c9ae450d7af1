//! Event routing: targets, the queue capability, and scoped subscriptions.
//!
//! The event queue is externally owned; the filter only needs four
//! operations from it, consumed through the [`EventQueue`] trait. Handler
//! adoption and removal are modeled as a scoped token ([`RoutingGuard`]) so
//! the release half of the pair runs on every teardown path, not just the
//! happy one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity events are routed by.
///
/// Every stream — raw transports and filters alike — exposes one. Targets
/// are process-unique and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventTarget(u64);

impl EventTarget {
    /// Allocate a fresh, process-unique target.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric identity, for logging and map keys.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Notification kinds a stream can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Bytes are available to read
    Readable,
    /// The stream reached end-of-input
    Closed,
    /// The stream failed
    Error,
}

/// A notification addressed to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Who this notification is about
    pub target: EventTarget,
    /// What happened
    pub event: StreamEvent,
}

/// Callback invoked when an event is delivered to its target's handler.
pub type EventHandler = Box<dyn FnMut(StreamEvent)>;

/// The event-queue capability the filter consumes.
///
/// Implementations are cheap-to-clone handles onto one shared queue
/// (single-threaded interior mutability is fine; nothing here requires
/// `Send`). The filter calls `remove_handlers` and `adopt_handler` exactly
/// once at construction and `remove_handler` exactly once at destruction —
/// the two removal operations stay distinct so each transition remains
/// individually observable.
pub trait EventQueue: Clone + 'static {
    /// Install `handler` for events addressed to `target`, replacing any
    /// previous handler for that target.
    fn adopt_handler(&self, target: EventTarget, handler: EventHandler);

    /// Remove the handler for `target`, if any.
    fn remove_handler(&self, target: EventTarget);

    /// Remove every handler registered against `target`.
    fn remove_handlers(&self, target: EventTarget);

    /// Enqueue an event for delivery to its target's handler.
    fn post(&self, event: Event);
}

/// Scoped ownership of event routing for one source target.
///
/// Construction performs the take-over (one `remove_handlers`, then one
/// `adopt_handler` on the source); `Drop` performs the release (one
/// `remove_handler`). Holding the guard *is* the subscription — there is no
/// way to leak a dangling handler registration.
pub struct RoutingGuard<Q: EventQueue> {
    queue: Q,
    source: EventTarget,
}

impl<Q: EventQueue> RoutingGuard<Q> {
    /// Take over event routing for `source`, installing `handler`.
    pub fn take_over(queue: Q, source: EventTarget, handler: EventHandler) -> Self {
        queue.remove_handlers(source);
        queue.adopt_handler(source, handler);
        Self { queue, source }
    }

    /// The source target this guard routes for.
    #[must_use]
    pub fn source(&self) -> EventTarget {
        self.source
    }
}

impl<Q: EventQueue> Drop for RoutingGuard<Q> {
    fn drop(&mut self) {
        self.queue.remove_handler(self.source);
    }
}

impl<Q: EventQueue> std::fmt::Debug for RoutingGuard<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingGuard").field("source", &self.source).finish_non_exhaustive()
    }
}
