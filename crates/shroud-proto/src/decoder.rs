//! Incremental, push-based frame decoder.
//!
//! Transport reads arrive at arbitrary granularity: a frame may be spread
//! over many reads, or one read may span several frames. The decoder
//! accumulates whatever it is given and yields complete frames one at a
//! time.
//!
//! The crucial extra for encrypted streams is [`FrameDecoder::needed`]: it
//! reports exactly how many bytes the current frame still requires. A
//! receiver that decrypts at most `needed()` bytes at a time can never
//! decrypt past the end of a Rotate frame with stale cipher state, which is
//! what makes byte-exact IV rotation possible without any out-of-band
//! signal.

use bytes::Bytes;

use crate::{
    errors::Result,
    frame::{ControlFrame, FRAME_HEADER_SIZE, Opcode, ROTATION_IV_SIZE, validate_body_len},
};

/// Streaming decoder for the control-frame channel.
///
/// Feed bytes with [`extend`](Self::extend), then drain completed frames
/// with [`poll`](Self::poll). Partial frames persist across calls; malformed
/// headers surface as errors on the first `poll` that sees them.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw frame bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes still required to complete the frame currently in progress.
    ///
    /// Returns the distance to the end of the current header if the header
    /// is incomplete, otherwise the distance to the end of the body. A
    /// return of 0 means a complete frame is buffered (or the buffered
    /// header is malformed) and [`poll`](Self::poll) should be called.
    #[must_use]
    pub fn needed(&self) -> usize {
        if self.buf.len() < FRAME_HEADER_SIZE {
            return FRAME_HEADER_SIZE - self.buf.len();
        }

        match self.parse_header() {
            Ok(body_len) => (FRAME_HEADER_SIZE + body_len).saturating_sub(self.buf.len()),
            Err(_) => 0,
        }
    }

    /// Take the next complete frame, if one is buffered.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownOpcode` / `InvalidRotation` /
    ///   `PayloadTooLarge` once a malformed header is fully buffered. The
    ///   decoder is not recoverable after an error; the stream is
    ///   desynchronized by definition.
    pub fn poll(&mut self) -> Result<Option<ControlFrame>> {
        if self.buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let body_len = self.parse_header()?;
        if self.buf.len() < FRAME_HEADER_SIZE + body_len {
            return Ok(None);
        }

        let opcode = Opcode::from_u8(self.buf[0])?;
        let body: Vec<u8> = self.buf.drain(..FRAME_HEADER_SIZE + body_len).skip(FRAME_HEADER_SIZE).collect();

        let frame = match opcode {
            Opcode::Data => ControlFrame::Data(Bytes::from(body)),
            Opcode::Rotate => {
                let mut iv = [0u8; ROTATION_IV_SIZE];
                iv.copy_from_slice(&body);
                ControlFrame::Rotate(iv)
            },
        };

        Ok(Some(frame))
    }

    /// Bytes currently buffered (partial frame state).
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Validate the buffered header and return the claimed body length.
    fn parse_header(&self) -> Result<usize> {
        debug_assert!(self.buf.len() >= FRAME_HEADER_SIZE);

        let opcode = Opcode::from_u8(self.buf[0])?;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&self.buf[1..FRAME_HEADER_SIZE]);
        let body_len = u32::from_be_bytes(len_bytes) as usize;

        validate_body_len(opcode, body_len)?;
        Ok(body_len)
    }
}
