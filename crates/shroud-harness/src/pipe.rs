//! In-process duplex byte pipe.
//!
//! Replaces the shared-global-buffer style of transport fake with an
//! explicit pair of ring buffers: each endpoint writes into its peer's
//! inbound buffer and reads from its own. Endpoints are cheap handles, so
//! a test can hand one endpoint to a filter and keep a clone for
//! inspection.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use shroud_core::{EventTarget, Transport, TransportError};

/// One direction's buffer plus its closed flag.
#[derive(Debug, Default)]
struct Lane {
    buf: VecDeque<u8>,
    closed: bool,
}

/// One endpoint of a duplex pipe.
///
/// Reads drain the endpoint's inbound lane; writes fill the peer's. An
/// empty lane reads as `Ok(0)` while open and `TransportError::Closed`
/// once the peer has closed and the lane is drained — mirroring the
/// event-driven transport contract.
#[derive(Debug, Clone)]
pub struct PipeTransport {
    inbound: Rc<RefCell<Lane>>,
    outbound: Rc<RefCell<Lane>>,
    target: EventTarget,
    read_limit: Option<usize>,
}

/// Create a connected pair of pipe endpoints.
#[must_use]
pub fn pipe() -> (PipeTransport, PipeTransport) {
    let a_to_b = Rc::new(RefCell::new(Lane::default()));
    let b_to_a = Rc::new(RefCell::new(Lane::default()));

    let a = PipeTransport {
        inbound: Rc::clone(&b_to_a),
        outbound: Rc::clone(&a_to_b),
        target: EventTarget::next(),
        read_limit: None,
    };
    let b = PipeTransport {
        inbound: a_to_b,
        outbound: b_to_a,
        target: EventTarget::next(),
        read_limit: None,
    };

    (a, b)
}

impl PipeTransport {
    /// Cap every read at `limit` bytes, regardless of what the caller asks
    /// for. Simulates a dribbling transport (short reads).
    pub fn set_read_limit(&mut self, limit: Option<usize>) {
        self.read_limit = limit;
    }

    /// Close the outbound half; the peer drains what is buffered and then
    /// sees `TransportError::Closed`.
    pub fn close(&self) {
        self.outbound.borrow_mut().closed = true;
    }

    /// Bytes currently buffered for this endpoint to read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbound.borrow().buf.len()
    }
}

impl Transport for PipeTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut lane = self.inbound.borrow_mut();

        if lane.buf.is_empty() {
            return if lane.closed { Err(TransportError::Closed) } else { Ok(0) };
        }

        let mut n = buf.len().min(lane.buf.len());
        if let Some(limit) = self.read_limit {
            n = n.min(limit);
        }

        for slot in &mut buf[..n] {
            // Length was clamped to the buffered amount above.
            *slot = lane.buf.pop_front().unwrap_or_default();
        }

        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        let mut lane = self.outbound.borrow_mut();
        if lane.closed {
            return Err(TransportError::Closed);
        }
        lane.buf.extend(buf);
        Ok(())
    }

    fn event_target(&self) -> EventTarget {
        self.target
    }
}
