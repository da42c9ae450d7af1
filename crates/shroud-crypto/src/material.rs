//! Key and IV material types.
//!
//! Fixed-length newtypes so wrong-sized material is unrepresentable past the
//! construction boundary. The key is secret and zeroized on drop; IVs are
//! synchronization seeds, not secrets, and may appear on the wire.

use zeroize::Zeroize;

use crate::error::CryptoError;

/// Key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// IV length in bytes (one AES block).
pub const IV_SIZE: usize = 16;

/// Cipher block length in bytes.
pub const BLOCK_SIZE: usize = 16;

/// A 256-bit cipher key.
///
/// Held exclusively by the filter after installation. Zeroized on drop and
/// redacted in debug output; the raw bytes are only reachable through
/// [`Key::as_bytes`] at the block-cipher construction seam.
#[derive(Clone)]
pub struct Key {
    bytes: [u8; KEY_SIZE],
}

impl Key {
    /// Wrap a fixed-size key.
    #[must_use]
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Wrap key material of unchecked length.
    ///
    /// # Errors
    ///
    /// - `CryptoError::KeyLength` if `bytes` is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::KeyLength { actual: bytes.len() })?;
        Ok(Self { bytes })
    }

    /// Raw key bytes, for handing to the block-cipher primitive.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(..)")
    }
}

/// A 16-byte initialization vector.
///
/// Seeds one direction's keystream. Both directions may start from the same
/// value at setup but rotate independently afterwards.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Iv {
    bytes: [u8; IV_SIZE],
}

impl Iv {
    /// Wrap a fixed-size IV.
    #[must_use]
    pub fn new(bytes: [u8; IV_SIZE]) -> Self {
        Self { bytes }
    }

    /// Wrap IV material of unchecked length.
    ///
    /// # Errors
    ///
    /// - `CryptoError::IvLength` if `bytes` is not exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; IV_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::IvLength { actual: bytes.len() })?;
        Ok(Self { bytes })
    }

    /// Raw IV bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.bytes
    }
}

impl From<[u8; IV_SIZE]> for Iv {
    fn from(bytes: [u8; IV_SIZE]) -> Self {
        Self::new(bytes)
    }
}

impl std::fmt::Debug for Iv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // IVs are not secret, but keeping them out of logs avoids leaking
        // rotation timing alongside payload traces.
        f.write_str("Iv(..)")
    }
}
