//! Error types for cipher material handling.

use thiserror::Error;

use crate::material::{IV_SIZE, KEY_SIZE};

/// Errors raised while constructing cipher material.
///
/// The engine itself is infallible once material is installed; only the
/// slice-to-fixed-array boundary can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material has the wrong length
    #[error("invalid key length: expected {KEY_SIZE} bytes, got {actual}")]
    KeyLength {
        /// Length of the rejected material
        actual: usize,
    },

    /// IV material has the wrong length
    #[error("invalid iv length: expected {IV_SIZE} bytes, got {actual}")]
    IvLength {
        /// Length of the rejected material
        actual: usize,
    },
}
