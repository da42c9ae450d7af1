//! Block-cipher capability seam.
//!
//! The keystream engine consumes the block primitive through a trait so the
//! cipher is substitutable in tests and the engine never touches key
//! schedules directly.

use aes::Aes256;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};

use crate::material::{BLOCK_SIZE, Key};

/// A deterministic, pure block-encryption capability.
///
/// Implementations must be stateless with respect to `encrypt_block`: the
/// same input block always produces the same output block. All stream state
/// (counter, offset) lives in [`Keystream`](crate::Keystream).
pub trait BlockCipher {
    /// Encrypt one 16-byte block in place.
    fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]);
}

/// AES-256 block primitive.
///
/// Owns the expanded key schedule. Cloning shares nothing mutable; the two
/// directions of a connection each clone one of these at arming time.
#[derive(Clone)]
pub struct Aes256Block {
    inner: Aes256,
}

impl Aes256Block {
    /// Expand the key schedule for a 256-bit key.
    #[must_use]
    pub fn new(key: &Key) -> Self {
        Self { inner: Aes256::new(GenericArray::from_slice(key.as_bytes())) }
    }
}

impl BlockCipher for Aes256Block {
    fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.inner.encrypt_block(GenericArray::from_mut_slice(block));
    }
}

impl std::fmt::Debug for Aes256Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The key schedule is key-equivalent material; never print it.
        f.write_str("Aes256Block(..)")
    }
}
