//! Deterministic PRNG for resolving random spawn kinds.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, good statistical
//! properties, and trivially serializable.

use serde::{Deserialize, Serialize};

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic for a given seed, so tests can pin down which primitive a
/// `random` spawn resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> SpawnRng {
        SpawnRng { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        // Use a high bit; SplitMix64's upper bits mix slightly better.
        self.next_u64() >> 63 == 1
    }

    /// Get the internal state (for snapshots).
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut a = SpawnRng::new(42);
        let mut b = SpawnRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = SpawnRng::new(1);
        let mut b = SpawnRng::new(2);
        // Extremely unlikely to match.
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn coin_roughly_balanced() {
        let mut rng = SpawnRng::new(12345);
        let trials = 10_000;
        let mut heads = 0u32;
        for _ in 0..trials {
            if rng.coin() {
                heads += 1;
            }
        }
        // Expect ~5000 with a very generous tolerance.
        assert!((4000..=6000).contains(&heads), "expected ~5000, got {heads}");
    }
}
