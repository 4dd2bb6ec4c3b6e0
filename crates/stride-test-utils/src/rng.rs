//! Deterministic RNG for reproducible tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded `ChaCha8Rng`. Randomized tests draw from this so failures replay.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
