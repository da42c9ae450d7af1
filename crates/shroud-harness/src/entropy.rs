//! Seeded entropy source for reproducible rotation scenarios.

use std::cell::RefCell;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use shroud_core::Entropy;

/// Deterministic entropy: the same seed produces the same byte sequence.
///
/// Only for tests. Production code uses
/// [`OsEntropy`](shroud_core::OsEntropy).
#[derive(Debug)]
pub struct SeededEntropy {
    rng: RefCell<ChaCha20Rng>,
}

impl SeededEntropy {
    /// Create a source from a 64-bit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: RefCell::new(ChaCha20Rng::seed_from_u64(seed)) }
    }
}

impl Entropy for SeededEntropy {
    fn random_bytes(&self, buf: &mut [u8]) {
        self.rng.borrow_mut().fill_bytes(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededEntropy::new(42);
        let b = SeededEntropy::new(42);

        let mut buf_a = [0u8; 16];
        let mut buf_b = [0u8; 16];
        a.random_bytes(&mut buf_a);
        b.random_bytes(&mut buf_b);

        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn draws_advance_the_stream() {
        let entropy = SeededEntropy::new(7);

        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        entropy.random_bytes(&mut first);
        entropy.random_bytes(&mut second);

        assert_ne!(first, second);
    }
}
