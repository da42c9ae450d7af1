//! Control-frame type and wire encoding.

use bytes::{BufMut, Bytes};

use crate::errors::{ProtocolError, Result};

/// Bytes of opcode plus length prefix preceding every frame body.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Length of the IV carried by a Rotate frame.
pub const ROTATION_IV_SIZE: usize = 16;

/// Maximum Data frame body (16 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Frame type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Payload bytes
    Data = 0x01,
    /// IV rotation announcement
    Rotate = 0x02,
}

impl Opcode {
    /// Parse an opcode byte.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownOpcode` for unassigned bytes
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(Self::Data),
            0x02 => Ok(Self::Rotate),
            opcode => Err(ProtocolError::UnknownOpcode { opcode }),
        }
    }
}

/// One frame of the rekeying channel.
///
/// `Data` carries payload bytes; `Rotate` announces that all traffic after
/// this frame, in both directions, uses the enclosed IV. The length prefix
/// makes the boundary explicit: there is no reserved marker to collide with
/// payload bytes, and a receiver knows the exact byte at which to reset its
/// cipher state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFrame {
    /// Payload bytes (ciphertext from the outer layer's perspective).
    Data(Bytes),
    /// Replacement IV taking effect at the first byte after this frame.
    Rotate([u8; ROTATION_IV_SIZE]),
}

impl ControlFrame {
    /// Opcode for this frame.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Data(_) => Opcode::Data,
            Self::Rotate(_) => Opcode::Rotate,
        }
    }

    /// Body length in bytes.
    #[must_use]
    pub fn body_len(&self) -> usize {
        match self {
            Self::Data(payload) => payload.len(),
            Self::Rotate(_) => ROTATION_IV_SIZE,
        }
    }

    /// Total encoded length, header included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.body_len()
    }

    /// Encode into `dst` as `[opcode][length][body]`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if a Data body exceeds
    ///   [`MAX_PAYLOAD_SIZE`]
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        let body_len = self.body_len();
        if body_len > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: body_len, max: MAX_PAYLOAD_SIZE });
        }

        // INVARIANT: body_len <= MAX_PAYLOAD_SIZE (16 MiB) < u32::MAX, so
        // the cast cannot truncate.
        dst.put_u8(self.opcode() as u8);
        dst.put_u32(body_len as u32);

        match self {
            Self::Data(payload) => dst.put_slice(payload),
            Self::Rotate(iv) => dst.put_slice(iv),
        }

        Ok(())
    }

    /// Decode one complete frame from the front of `bytes`.
    ///
    /// Returns the frame and the number of bytes consumed. Trailing bytes
    /// are ignored; use [`FrameDecoder`](crate::FrameDecoder) for streams.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Truncated` if `bytes` ends before the frame does
    /// - `ProtocolError::UnknownOpcode` / `InvalidRotation` /
    ///   `PayloadTooLarge` for malformed headers
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < FRAME_HEADER_SIZE {
            return Err(ProtocolError::Truncated {
                expected: FRAME_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let opcode = Opcode::from_u8(bytes[0])?;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[1..FRAME_HEADER_SIZE]);
        let body_len = u32::from_be_bytes(len_bytes) as usize;

        validate_body_len(opcode, body_len)?;

        let body = &bytes[FRAME_HEADER_SIZE..];
        if body.len() < body_len {
            return Err(ProtocolError::Truncated { expected: body_len, actual: body.len() });
        }

        let frame = match opcode {
            Opcode::Data => Self::Data(Bytes::copy_from_slice(&body[..body_len])),
            Opcode::Rotate => {
                let mut iv = [0u8; ROTATION_IV_SIZE];
                iv.copy_from_slice(&body[..ROTATION_IV_SIZE]);
                Self::Rotate(iv)
            },
        };

        Ok((frame, FRAME_HEADER_SIZE + body_len))
    }
}

/// Check a header-claimed body length against the opcode's rules.
pub(crate) fn validate_body_len(opcode: Opcode, body_len: usize) -> Result<()> {
    match opcode {
        Opcode::Data if body_len > MAX_PAYLOAD_SIZE => {
            Err(ProtocolError::PayloadTooLarge { size: body_len, max: MAX_PAYLOAD_SIZE })
        },
        Opcode::Rotate if body_len != ROTATION_IV_SIZE => {
            Err(ProtocolError::InvalidRotation { expected: ROTATION_IV_SIZE, actual: body_len })
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frame_encodes_header_and_body() {
        let frame = ControlFrame::Data(Bytes::from_static(b"abcd"));

        let mut wire = Vec::new();
        frame.encode(&mut wire).unwrap();

        assert_eq!(wire, [0x01, 0, 0, 0, 4, b'a', b'b', b'c', b'd']);
        assert_eq!(wire.len(), frame.encoded_len());
    }

    #[test]
    fn rotate_frame_carries_exactly_one_iv() {
        let frame = ControlFrame::Rotate([0xCC; ROTATION_IV_SIZE]);

        let mut wire = Vec::new();
        frame.encode(&mut wire).unwrap();

        assert_eq!(wire[0], 0x02);
        assert_eq!(wire[1..5], 16u32.to_be_bytes());
        assert_eq!(&wire[5..], &[0xCC; ROTATION_IV_SIZE]);
    }

    #[test]
    fn decode_round_trips() {
        let frame = ControlFrame::Data(Bytes::from_static(b"payload"));
        let mut wire = Vec::new();
        frame.encode(&mut wire).unwrap();

        let (decoded, consumed) = ControlFrame::decode(&wire).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let frame = ControlFrame::Rotate([7; ROTATION_IV_SIZE]);
        let mut wire = Vec::new();
        frame.encode(&mut wire).unwrap();
        let frame_len = wire.len();
        wire.extend_from_slice(b"next frame starts here");

        let (decoded, consumed) = ControlFrame::decode(&wire).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(consumed, frame_len);
    }

    #[test]
    fn reject_unknown_opcode() {
        let wire = [0x7F, 0, 0, 0, 0];
        let result = ControlFrame::decode(&wire);
        assert!(matches!(result, Err(ProtocolError::UnknownOpcode { opcode: 0x7F })));
    }

    #[test]
    fn reject_truncated_body() {
        let mut wire = Vec::new();
        ControlFrame::Data(Bytes::from_static(b"abcd")).encode(&mut wire).unwrap();
        wire.truncate(7);

        let result = ControlFrame::decode(&wire);
        assert!(matches!(result, Err(ProtocolError::Truncated { expected: 4, actual: 2 })));
    }

    #[test]
    fn reject_rotation_with_wrong_length() {
        // Hand-built header claiming an 8-byte rotation body.
        let mut wire = vec![0x02, 0, 0, 0, 8];
        wire.extend_from_slice(&[0; 8]);

        let result = ControlFrame::decode(&wire);
        assert!(matches!(
            result,
            Err(ProtocolError::InvalidRotation { expected: ROTATION_IV_SIZE, actual: 8 })
        ));
    }

    #[test]
    fn reject_oversized_data_frame() {
        let frame = ControlFrame::Data(Bytes::from(vec![0u8; MAX_PAYLOAD_SIZE + 1]));
        let mut wire = Vec::new();
        let result = frame.encode(&mut wire);
        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge { .. })));
    }
}
