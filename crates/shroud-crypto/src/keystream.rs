//! Counter-mode keystream engine.
//!
//! Keystream block `i` is `encrypt_block(iv + i)` where the IV is treated as
//! a 128-bit big-endian integer and addition wraps. The engine hands out
//! keystream one byte at a time internally, which makes position advancement
//! identical for any call granularity: processing N bytes in one call and
//! processing them in N calls of one byte leave the engine in the same state
//! and produce the same output (batch-invariance law).

use zeroize::Zeroize;

use crate::{
    block::BlockCipher,
    material::{BLOCK_SIZE, Iv},
};

/// Per-direction cipher position.
///
/// `offset` strictly cycles through `[0, 16)` and resets to 0 only together
/// with a block advance or an explicit IV reset. The position never rewinds
/// except through [`Keystream::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CipherPosition {
    /// Index of the keystream block currently being consumed.
    pub block: u64,
    /// Next unconsumed byte within that block, in `[0, 16)`.
    pub offset: usize,
}

impl CipherPosition {
    /// Position at the start of a keystream.
    pub const START: Self = Self { block: 0, offset: 0 };

    /// Total number of keystream bytes consumed since the last reset.
    #[must_use]
    pub fn bytes_consumed(&self) -> u128 {
        u128::from(self.block) * BLOCK_SIZE as u128 + self.offset as u128
    }
}

/// One direction's keystream generator.
///
/// Owns the block-cipher capability and the mutable position for a single
/// direction. Encryption and decryption are the same operation
/// ([`Keystream::apply`]) because XOR is self-inverse; what matters is that
/// sender and receiver apply it at matching positions.
pub struct Keystream<C: BlockCipher> {
    cipher: C,
    /// IV interpreted as a big-endian counter base.
    base: u128,
    position: CipherPosition,
    /// Keystream bytes for `position.block`.
    block: [u8; BLOCK_SIZE],
}

impl<C: BlockCipher> Keystream<C> {
    /// Create an engine at position zero, deriving the first keystream block.
    pub fn new(cipher: C, iv: &Iv) -> Self {
        let mut stream = Self {
            cipher,
            base: u128::from_be_bytes(*iv.as_bytes()),
            position: CipherPosition::START,
            block: [0; BLOCK_SIZE],
        };
        stream.refill();
        stream
    }

    /// Current position. Monotonic between resets.
    #[must_use]
    pub fn position(&self) -> CipherPosition {
        self.position
    }

    /// Reinitialize with a new seed, discarding buffered keystream.
    ///
    /// Both peers must call this at the exact matching byte boundary; a
    /// single byte of skew desynchronizes the direction permanently.
    pub fn reset(&mut self, iv: &Iv) {
        self.block.zeroize();
        self.base = u128::from_be_bytes(*iv.as_bytes());
        self.position = CipherPosition::START;
        self.refill();
    }

    /// XOR `buf` with keystream, in place.
    ///
    /// Encrypts plaintext or decrypts ciphertext; the engine does not know
    /// or care which. Advances the position by exactly `buf.len()` bytes.
    pub fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte ^= self.next_byte();
        }
    }

    fn next_byte(&mut self) -> u8 {
        debug_assert!(self.position.offset < BLOCK_SIZE);

        let byte = self.block[self.position.offset];
        self.position.offset += 1;

        if self.position.offset == BLOCK_SIZE {
            self.position.block = self.position.block.wrapping_add(1);
            self.position.offset = 0;
            self.refill();
        }

        byte
    }

    /// Recompute the keystream block for the current position.
    fn refill(&mut self) {
        self.block = self.base.wrapping_add(u128::from(self.position.block)).to_be_bytes();
        self.cipher.encrypt_block(&mut self.block);
    }
}

impl<C: BlockCipher> Drop for Keystream<C> {
    fn drop(&mut self) {
        self.block.zeroize();
    }
}

impl<C: BlockCipher> std::fmt::Debug for Keystream<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Position only; buffered keystream is key-equivalent material.
        f.debug_struct("Keystream").field("position", &self.position).finish_non_exhaustive()
    }
}
