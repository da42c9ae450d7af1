//! Entropy abstraction for deterministic testing.
//!
//! Decouples IV generation from the system RNG. Production uses
//! [`OsEntropy`]; tests substitute a seeded source so rotation scenarios
//! replay byte-for-byte.

use rand::RngCore;

/// A source of random bytes.
///
/// Implementations MUST use cryptographically secure entropy in production;
/// freshly generated IVs go on the wire and seed keystreams.
pub trait Entropy {
    /// Fill `buf` with random bytes.
    fn random_bytes(&self, buf: &mut [u8]);
}

/// Operating-system entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn random_bytes(&self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}
