//! Shroud control-frame protocol
//!
//! The rekeying channel for an encrypted byte stream. Payload bytes and IV
//! rotation announcements are multiplexed over the same stream as explicit
//! length-prefixed frames, so a rotation marker can never be misread out of
//! ordinary traffic: every byte on the stream belongs to exactly one typed
//! frame.
//!
//! Wire format (all integers big-endian):
//!
//! ```text
//! [opcode: u8] [length: u32] [body: length bytes]
//! ```
//!
//! Opcode `0x01` (Data) carries payload bytes, up to 16 MiB per frame.
//! Opcode `0x02` (Rotate) carries exactly one 16-byte replacement IV; the
//! rotation takes effect at the first byte after the frame.
//!
//! This layer is framing only. It neither encrypts nor decrypts; callers
//! feed it plaintext frame bytes (typically obtained by decrypting a
//! transport stream) and the [`FrameDecoder`] tells them, via
//! [`FrameDecoder::needed`], exactly how many bytes it can accept before the
//! next frame boundary — which is what lets a receiver rotate cipher state
//! at the precise byte the sender did.

pub mod decoder;
pub mod errors;
pub mod frame;

pub use decoder::FrameDecoder;
pub use errors::ProtocolError;
pub use frame::{ControlFrame, FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE, Opcode, ROTATION_IV_SIZE};
