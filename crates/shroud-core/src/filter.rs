//! The duplex encryption filter.
//!
//! [`CryptoStream`] decorates an externally-owned transport: outbound bytes
//! are encrypted with the send keystream, inbound bytes decrypted with the
//! receive keystream, and the inner transport's events are re-exposed under
//! the filter's own identity.
//!
//! # Call Mapping
//!
//! The filter maps caller I/O to inner I/O strictly 1:1 and holds no
//! buffers of its own:
//!
//! - `write(buf)` performs exactly one inner write of `buf.len()` bytes —
//!   never split, never coalesced, even for a single byte.
//! - `read(buf)` performs exactly one inner read requesting `buf.len()`
//!   bytes and decrypts exactly the bytes returned.
//!
//! A failed inner call leaves no partial result behind; the error
//! propagates unchanged.
//!
//! # Rekeying
//!
//! [`CryptoStream::new_iv`] mints a fresh IV without installing it;
//! [`CryptoStream::set_iv`] reinitializes both directions from an IV while
//! keeping the key. Both peers must apply the same IV at the same stream
//! position — delivery is the caller's (or the session layer's) problem.

use shroud_crypto::{Aes256Block, Iv, Key, Keystream};

use crate::{
    entropy::Entropy,
    error::FilterError,
    event::{Event, EventQueue, EventTarget, RoutingGuard},
    transport::Transport,
};

/// Per-direction engines, present only once the filter is armed.
#[derive(Debug)]
struct Directions {
    send: Keystream<Aes256Block>,
    recv: Keystream<Aes256Block>,
}

/// Duplex stream decorator encrypting writes and decrypting reads.
///
/// Constructed around a live transport and event-queue handle. Unusable
/// until [`set_key_with_iv`](Self::set_key_with_iv) arms it; use before
/// arming is a contract violation surfaced as [`FilterError::NotArmed`].
///
/// Dropping the filter releases its event routing (exactly one handler
/// removal) and never closes or otherwise affects the transport.
pub struct CryptoStream<T: Transport, Q: EventQueue> {
    // Declared first: routing must be released before the transport handle
    // can be dropped or reused.
    routing: RoutingGuard<Q>,
    target: EventTarget,
    transport: T,
    directions: Option<Directions>,
}

impl<T: Transport, Q: EventQueue> CryptoStream<T, Q> {
    /// Wrap `transport`, taking over its event routing.
    ///
    /// Removes any handler set previously attached to the transport's
    /// target, then adopts a bridge handler that re-posts the transport's
    /// events under this filter's own target. Exactly one take-over per
    /// filter instance; the inverse release happens exactly once on drop.
    pub fn new(queue: Q, transport: T) -> Self {
        let target = EventTarget::next();
        let source = transport.event_target();

        let bridge = queue.clone();
        let routing = RoutingGuard::take_over(
            queue,
            source,
            Box::new(move |event| bridge.post(Event { target, event })),
        );

        tracing::debug!(source = source.id(), filter = target.id(), "stream routing adopted");

        Self { routing, target, transport, directions: None }
    }

    /// Install the key and initial IV, arming both directions.
    ///
    /// Called exactly once per filter.
    ///
    /// # Errors
    ///
    /// - `FilterError::AlreadyArmed` on a second call
    pub fn set_key_with_iv(&mut self, key: &Key, iv: &Iv) -> Result<(), FilterError> {
        if self.directions.is_some() {
            return Err(FilterError::AlreadyArmed);
        }

        let cipher = Aes256Block::new(key);
        self.directions = Some(Directions {
            send: Keystream::new(cipher.clone(), iv),
            recv: Keystream::new(cipher, iv),
        });

        tracing::debug!(filter = self.target.id(), "filter armed");
        Ok(())
    }

    /// Whether key and IV have been installed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.directions.is_some()
    }

    /// Encrypt `plaintext` and forward it in one inner write.
    ///
    /// # Errors
    ///
    /// - `FilterError::NotArmed` before key installation
    /// - `FilterError::Transport` propagated from the inner write
    pub fn write(&mut self, plaintext: &[u8]) -> Result<(), FilterError> {
        let directions = self.directions.as_mut().ok_or(FilterError::NotArmed)?;

        let mut ciphertext = plaintext.to_vec();
        directions.send.apply(&mut ciphertext);
        self.transport.write(&ciphertext)?;

        Ok(())
    }

    /// Issue one inner read for `buf.len()` bytes and decrypt the result.
    ///
    /// Returns the number of bytes read. The receive position advances by
    /// exactly that many bytes, so partial reads stay synchronized.
    ///
    /// # Errors
    ///
    /// - `FilterError::NotArmed` before key installation (checked before
    ///   the inner read so no ciphertext is consumed)
    /// - `FilterError::Transport` propagated from the inner read
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, FilterError> {
        let directions = self.directions.as_mut().ok_or(FilterError::NotArmed)?;

        let n = self.transport.read(buf)?;
        directions.recv.apply(&mut buf[..n]);

        Ok(n)
    }

    /// Mint a fresh random IV without installing it.
    ///
    /// The caller (or the session layer) is responsible for delivering it
    /// to the peer and for the eventual [`set_iv`](Self::set_iv) on both
    /// ends at matching positions.
    pub fn new_iv<E: Entropy>(&self, entropy: &E) -> Iv {
        let mut bytes = [0u8; shroud_crypto::IV_SIZE];
        entropy.random_bytes(&mut bytes);
        Iv::new(bytes)
    }

    /// Reinitialize both directions from `iv`, keeping the key.
    ///
    /// All traffic after this call, in both directions, uses the new IV;
    /// traffic encrypted before it will no longer decrypt.
    ///
    /// # Errors
    ///
    /// - `FilterError::NotArmed` before key installation
    pub fn set_iv(&mut self, iv: &Iv) -> Result<(), FilterError> {
        let directions = self.directions.as_mut().ok_or(FilterError::NotArmed)?;

        directions.send.reset(iv);
        directions.recv.reset(iv);

        tracing::debug!(filter = self.target.id(), "cipher state rotated");
        Ok(())
    }

    /// The identity this filter's events are posted under.
    #[must_use]
    pub fn event_target(&self) -> EventTarget {
        self.target
    }

    /// The transport target whose routing this filter owns.
    #[must_use]
    pub fn routed_source(&self) -> EventTarget {
        self.routing.source()
    }
}

impl<T: Transport, Q: EventQueue> std::fmt::Debug for CryptoStream<T, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoStream")
            .field("target", &self.target)
            .field("armed", &self.is_armed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{error::TransportError, event::EventHandler};

    /// Minimal transport: writes accumulate, reads drain.
    #[derive(Clone)]
    struct LoopTransport {
        buf: Rc<RefCell<Vec<u8>>>,
        target: EventTarget,
    }

    impl LoopTransport {
        fn new() -> Self {
            Self { buf: Rc::default(), target: EventTarget::next() }
        }
    }

    impl Transport for LoopTransport {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
            let mut inner = self.buf.borrow_mut();
            let n = buf.len().min(inner.len());
            buf[..n].copy_from_slice(&inner[..n]);
            inner.drain(..n);
            Ok(n)
        }

        fn write(&mut self, buf: &[u8]) -> Result<(), TransportError> {
            self.buf.borrow_mut().extend_from_slice(buf);
            Ok(())
        }

        fn event_target(&self) -> EventTarget {
            self.target
        }
    }

    /// Queue that ignores everything; lifecycle counts are covered by the
    /// harness-backed integration tests.
    #[derive(Clone, Default)]
    struct NullQueue;

    impl EventQueue for NullQueue {
        fn adopt_handler(&self, _target: EventTarget, _handler: EventHandler) {}
        fn remove_handler(&self, _target: EventTarget) {}
        fn remove_handlers(&self, _target: EventTarget) {}
        fn post(&self, _event: Event) {}
    }

    fn test_key() -> Key {
        Key::new([0x42; 32])
    }

    fn test_iv() -> Iv {
        Iv::new([0x24; 16])
    }

    #[test]
    fn write_before_arming_fails_fast() {
        let mut filter = CryptoStream::new(NullQueue, LoopTransport::new());
        let result = filter.write(b"too early");
        assert_eq!(result, Err(FilterError::NotArmed));
    }

    #[test]
    fn read_before_arming_fails_fast() {
        let mut filter = CryptoStream::new(NullQueue, LoopTransport::new());
        let mut buf = [0u8; 4];
        assert_eq!(filter.read(&mut buf), Err(FilterError::NotArmed));
    }

    #[test]
    fn set_iv_before_arming_fails_fast() {
        let mut filter = CryptoStream::new(NullQueue, LoopTransport::new());
        assert_eq!(filter.set_iv(&test_iv()), Err(FilterError::NotArmed));
    }

    #[test]
    fn arming_twice_is_rejected() {
        let mut filter = CryptoStream::new(NullQueue, LoopTransport::new());
        filter.set_key_with_iv(&test_key(), &test_iv()).unwrap();

        let result = filter.set_key_with_iv(&test_key(), &test_iv());
        assert_eq!(result, Err(FilterError::AlreadyArmed));
        assert!(filter.is_armed());
    }

    #[test]
    fn loopback_round_trip() {
        let transport = LoopTransport::new();
        let mut writer = CryptoStream::new(NullQueue, transport.clone());
        let mut reader = CryptoStream::new(NullQueue, transport);
        writer.set_key_with_iv(&test_key(), &test_iv()).unwrap();
        reader.set_key_with_iv(&test_key(), &test_iv()).unwrap();

        writer.write(b"round trip").unwrap();

        let mut buf = [0u8; 10];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 10);
        assert_eq!(&buf, b"round trip");
    }

    #[test]
    fn partial_read_keeps_positions_aligned() {
        let transport = LoopTransport::new();
        let mut writer = CryptoStream::new(NullQueue, transport.clone());
        let mut reader = CryptoStream::new(NullQueue, transport);
        writer.set_key_with_iv(&test_key(), &test_iv()).unwrap();
        reader.set_key_with_iv(&test_key(), &test_iv()).unwrap();

        writer.write(b"ab").unwrap();

        // Ask for more than is available: a short read must advance the
        // receive position by only the bytes returned.
        let mut buf = [0u8; 8];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], b"ab");

        writer.write(b"cd").unwrap();
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], b"cd");
    }

    #[test]
    fn new_iv_does_not_install() {
        struct FixedEntropy(u8);
        impl Entropy for FixedEntropy {
            fn random_bytes(&self, buf: &mut [u8]) {
                buf.fill(self.0);
            }
        }

        let transport = LoopTransport::new();
        let mut writer = CryptoStream::new(NullQueue, transport.clone());
        let mut reader = CryptoStream::new(NullQueue, transport);
        writer.set_key_with_iv(&test_key(), &test_iv()).unwrap();
        reader.set_key_with_iv(&test_key(), &test_iv()).unwrap();

        let minted = writer.new_iv(&FixedEntropy(0x77));
        assert_eq!(minted, Iv::new([0x77; 16]));

        // Traffic still flows under the original IV.
        writer.write(b"still old iv").unwrap();
        let mut buf = [0u8; 12];
        reader.read(&mut buf).unwrap();
        assert_eq!(&buf, b"still old iv");
    }
}
