//! Error types for control-frame encoding and decoding.

use thiserror::Error;

/// Errors raised by frame construction, encoding, or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame body exceeds the per-frame limit
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Size of the rejected payload
        size: usize,
        /// Maximum allowed payload size
        max: usize,
    },

    /// Opcode byte does not name a known frame type
    #[error("unknown opcode: {opcode:#04x}")]
    UnknownOpcode {
        /// The rejected opcode byte
        opcode: u8,
    },

    /// Rotate frame body is not exactly one IV
    #[error("invalid rotation body: expected {expected} bytes, header claims {actual}")]
    InvalidRotation {
        /// Required rotation body length
        expected: usize,
        /// Length claimed by the frame header
        actual: usize,
    },

    /// Buffer ends before the frame the header describes
    #[error("truncated frame: body needs {expected} bytes, only {actual} available")]
    Truncated {
        /// Body length claimed by the header
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },
}

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;
