//! Transport capability consumed by the filter.

use crate::{error::TransportError, event::EventTarget};

/// The byte-stream capability the filter decorates.
///
/// Implementations are externally owned: the filter never opens, closes, or
/// retries them. In the event-driven model, callers read after being
/// notified the stream is readable, so a short or empty read is ordinary,
/// not an error.
pub trait Transport {
    /// Read up to `buf.len()` bytes into `buf`, returning how many were
    /// read. `Ok(0)` means no bytes are currently available.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` once the peer has closed and all buffered
    ///   bytes are drained
    /// - `TransportError::Io` for underlying failures
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Write all of `buf`.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` / `TransportError::Io` per the transport
    fn write(&mut self, buf: &[u8]) -> Result<(), TransportError>;

    /// The identity this transport's events are posted under.
    fn event_target(&self) -> EventTarget;
}
