//! Deterministic test doubles for the shroud filter stack.
//!
//! Implementations of the core capability traits with no process-wide
//! mutable state: an explicit in-process duplex pipe instead of shared
//! static buffers, a recording event queue with a synchronous dispatch
//! loop, an instrumented transport wrapper for call-mapping assertions, and
//! a seeded entropy source so rotation scenarios replay byte-for-byte.
//!
//! Everything here is single-threaded by design, matching the core's
//! cooperative execution model; handles are cheap `Rc` clones.

pub mod entropy;
pub mod instrumented;
pub mod pipe;
pub mod queue;

pub use entropy::SeededEntropy;
pub use instrumented::{InstrumentedTransport, TransportLog};
pub use pipe::{PipeTransport, pipe};
pub use queue::{QueueCounts, RecordingQueue};
