//! Instrumented transport wrapper for call-mapping assertions.

use std::{cell::RefCell, rc::Rc};

use shroud_core::{EventTarget, Transport, TransportError};

#[derive(Debug, Default)]
struct LogState {
    /// (requested, returned) per read call
    reads: Vec<(usize, usize)>,
    /// Full bytes of each write call
    writes: Vec<Vec<u8>>,
}

/// Shared view onto an [`InstrumentedTransport`]'s call history.
///
/// Held by the test while the transport itself is owned by a filter.
#[derive(Debug, Clone, Default)]
pub struct TransportLog {
    state: Rc<RefCell<LogState>>,
}

impl TransportLog {
    /// Number of inner read calls observed.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.state.borrow().reads.len()
    }

    /// `(requested, returned)` sizes per read call, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<(usize, usize)> {
        self.state.borrow().reads.clone()
    }

    /// Number of inner write calls observed.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    /// Bytes of each write call, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }
}

/// Transport decorator recording every call before forwarding it.
#[derive(Debug)]
pub struct InstrumentedTransport<T: Transport> {
    inner: T,
    log: TransportLog,
}

impl<T: Transport> InstrumentedTransport<T> {
    /// Wrap `inner`, returning the wrapper and a log handle.
    pub fn new(inner: T) -> (Self, TransportLog) {
        let log = TransportLog::default();
        (Self { inner, log: log.clone() }, log)
    }
}

impl<T: Transport> Transport for InstrumentedTransport<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let n = self.inner.read(buf)?;
        self.log.state.borrow_mut().reads.push((buf.len(), n));
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        self.inner.write(buf)?;
        self.log.state.borrow_mut().writes.push(buf.to_vec());
        Ok(())
    }

    fn event_target(&self) -> EventTarget {
        self.inner.event_target()
    }
}
