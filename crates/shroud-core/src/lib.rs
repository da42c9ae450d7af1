//! Shroud transport encryption filter
//!
//! A duplex stream decorator that transparently encrypts outbound and
//! decrypts inbound traffic for an externally-owned byte transport, while
//! participating in an event-driven I/O model: consumers are notified of
//! readability and errors through an event queue rather than polling.
//!
//! # Layering
//!
//! ```text
//! caller ──write──> CryptoStream ──one write──> Transport
//! caller <──read─── CryptoStream <──one read─── Transport
//!                        │
//!                  RoutingGuard  (transport events re-posted
//!                        │        under the filter's target)
//!                   EventQueue
//! ```
//!
//! [`CryptoStream`] is the raw filter: strict 1:1 call mapping to the inner
//! transport, no internal buffering, out-of-band rekeying via
//! [`CryptoStream::new_iv`] / [`CryptoStream::set_iv`].
//!
//! [`SecureSession`] layers the in-band rekeying channel on top: traffic
//! becomes length-prefixed control frames (`shroud-proto`), and IV rotation
//! is announced over the same byte stream with a byte-exact boundary.
//!
//! # Capability Seams
//!
//! The transport, event queue, and entropy source are consumed through the
//! [`Transport`], [`EventQueue`], and [`Entropy`] traits, injected at
//! construction. Production code plugs in real sockets and queues; tests
//! substitute the deterministic doubles from `shroud-harness`.
//!
//! # Concurrency
//!
//! Single-threaded and cooperative. No trait here requires `Send` or
//! `Sync`; cipher state and handler registrations are only ever touched by
//! the thread driving the event loop. The filter itself never blocks.

pub mod entropy;
pub mod error;
pub mod event;
pub mod filter;
pub mod session;
pub mod transport;

pub use entropy::{Entropy, OsEntropy};
pub use error::{FilterError, SessionError, TransportError};
pub use event::{Event, EventHandler, EventQueue, EventTarget, RoutingGuard, StreamEvent};
pub use filter::CryptoStream;
pub use session::SecureSession;
pub use transport::Transport;
