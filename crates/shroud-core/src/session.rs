//! In-band rekeying session over the filter.
//!
//! [`SecureSession`] turns the raw byte filter into a framed channel:
//! payloads travel as Data frames and IV rotation is announced over the
//! same stream as a Rotate frame (`shroud-proto`). Frames are encrypted
//! whole — header and body — by the underlying [`CryptoStream`], so the
//! framing is invisible on the wire and the rotation boundary is the last
//! ciphertext byte of the Rotate frame.
//!
//! # Rotation Boundary
//!
//! The sender encrypts the Rotate frame under the outgoing state, performs
//! its single inner write, and only then resets its own state. The receiver
//! reads in increments bounded by [`FrameDecoder::needed`], which
//! guarantees it never decrypts a byte past the end of the frame currently
//! in progress; the moment a Rotate frame completes, it resets before
//! touching the next ciphertext byte. Both ends therefore rotate at the
//! exact same stream position without any out-of-band handshake.
//!
//! Rotation resets both directions on both ends, so it assumes the channel
//! is quiescent in the opposite direction when a rotation is issued (a
//! request/response or turn-taking discipline). Full-duplex traffic
//! straddling a rotation would need per-direction rotation frames instead.

use bytes::Bytes;
use shroud_crypto::Iv;
use shroud_proto::{ControlFrame, FrameDecoder};

use crate::{
    entropy::Entropy,
    error::SessionError,
    event::{EventQueue, EventTarget},
    filter::CryptoStream,
    transport::Transport,
};

/// Framed, rekeyable channel over an armed [`CryptoStream`].
pub struct SecureSession<T: Transport, Q: EventQueue> {
    stream: CryptoStream<T, Q>,
    decoder: FrameDecoder,
}

impl<T: Transport, Q: EventQueue> SecureSession<T, Q> {
    /// Layer a session over `stream`.
    ///
    /// The stream should already be armed; an unarmed stream surfaces as
    /// `FilterError::NotArmed` on first use, same as the raw filter.
    pub fn new(stream: CryptoStream<T, Q>) -> Self {
        Self { stream, decoder: FrameDecoder::new() }
    }

    /// Send `payload` as one Data frame (one filter write).
    ///
    /// # Errors
    ///
    /// - `SessionError::Protocol` if `payload` exceeds the frame size limit
    /// - `SessionError::Filter` from the filter or transport
    pub fn send(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        let frame = ControlFrame::Data(Bytes::copy_from_slice(payload));
        self.write_frame(&frame)
    }

    /// Mint a fresh IV, announce it in-band, and rotate local state.
    ///
    /// The Rotate frame is encrypted under the old state; the reset happens
    /// immediately after the write, atomically with respect to this
    /// session's send position. Returns the minted IV for observability.
    ///
    /// # Errors
    ///
    /// - `SessionError::Filter` from the filter or transport
    pub fn rotate<E: Entropy>(&mut self, entropy: &E) -> Result<Iv, SessionError> {
        let iv = self.stream.new_iv(entropy);
        self.write_frame(&ControlFrame::Rotate(*iv.as_bytes()))?;
        self.stream.set_iv(&iv)?;

        tracing::debug!(filter = self.stream.event_target().id(), "session rekeyed in-band");
        Ok(iv)
    }

    /// Receive the next Data payload, applying any rotations encountered.
    ///
    /// Returns `Ok(None)` when the transport has no more bytes right now
    /// and no complete frame is buffered; partial frame state is kept for
    /// the next call (resume after the next readable notification).
    ///
    /// # Errors
    ///
    /// - `SessionError::Protocol` on a malformed inbound frame
    /// - `SessionError::Filter` from the filter or transport
    pub fn recv(&mut self) -> Result<Option<Bytes>, SessionError> {
        loop {
            if let Some(frame) = self.decoder.poll()? {
                match frame {
                    ControlFrame::Data(payload) => return Ok(Some(payload)),
                    ControlFrame::Rotate(iv) => {
                        // Reset before the next ciphertext byte is touched:
                        // this is the byte-exact rotation boundary.
                        self.stream.set_iv(&Iv::new(iv))?;
                        tracing::debug!(
                            filter = self.stream.event_target().id(),
                            "applied peer-announced rotation"
                        );
                    },
                }
                continue;
            }

            let needed = self.decoder.needed();
            debug_assert!(needed > 0, "decoder must want bytes when no frame is ready");

            let mut scratch = vec![0u8; needed];
            let n = self.stream.read(&mut scratch)?;
            if n == 0 {
                return Ok(None);
            }
            self.decoder.extend(&scratch[..n]);
        }
    }

    /// The filter's event identity (events for the transport surface here).
    #[must_use]
    pub fn event_target(&self) -> EventTarget {
        self.stream.event_target()
    }

    /// Access the underlying filter (arming, out-of-band rekeying).
    pub fn stream_mut(&mut self) -> &mut CryptoStream<T, Q> {
        &mut self.stream
    }

    fn write_frame(&mut self, frame: &ControlFrame) -> Result<(), SessionError> {
        let mut wire = Vec::with_capacity(frame.encoded_len());
        frame.encode(&mut wire)?;
        self.stream.write(&wire)?;
        Ok(())
    }
}

impl<T: Transport, Q: EventQueue> std::fmt::Debug for SecureSession<T, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureSession").field("stream", &self.stream).finish_non_exhaustive()
    }
}
