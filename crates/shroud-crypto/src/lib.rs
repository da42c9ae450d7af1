//! Shroud stream-cipher primitives
//!
//! Per-direction keystream generation for the transport encryption filter.
//! The engine is AES-256 in counter mode: keystream block `i` is the block
//! encryption of `iv + i` (big-endian counter arithmetic), and plaintext or
//! ciphertext is combined with the keystream by XOR. XOR is self-inverse, so
//! a single engine operation serves both directions and no encrypt/decrypt
//! mode flag exists at the byte level.
//!
//! # Position Discipline
//!
//! Each direction of a connection owns one [`Keystream`]. Every processed
//! byte advances its position by exactly one, whether bytes arrive
//! one-at-a-time or in a single batch. Sender and receiver stay synchronized
//! only as long as their positions advance in lockstep; a single byte of
//! skew corrupts all subsequent traffic on that direction. Position resets
//! happen solely through [`Keystream::reset`] with a fresh IV, which both
//! peers must apply at the exact matching byte boundary.
//!
//! # Security
//!
//! - Key material is held in [`Key`], zeroized on drop, redacted in `Debug`
//! - Cached keystream bytes are zeroized on reset and drop
//! - The block primitive is consumed through the [`BlockCipher`] trait and
//!   carries no mutable state; all cipher state lives in [`Keystream`]
//! - No authentication: this layer provides confidentiality only, integrity
//!   belongs to an outer layer

pub mod block;
pub mod error;
pub mod keystream;
pub mod material;

pub use block::{Aes256Block, BlockCipher};
pub use error::CryptoError;
pub use keystream::{CipherPosition, Keystream};
pub use material::{BLOCK_SIZE, IV_SIZE, Iv, KEY_SIZE, Key};
