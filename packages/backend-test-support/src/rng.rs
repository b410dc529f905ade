//! Seeded ChaCha randomness so deals replay exactly.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 0x5EED_5EED;

/// Seed from `TEST_SEED` when set, else a fixed default. Failing tests log
/// the seed so a run can be replayed with `TEST_SEED=<seed>`.
pub fn seed_from_env() -> u64 {
    std::env::var("TEST_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

/// A shared seeded generator. Each draw advances one stream, so a sequence
/// of shuffles is reproducible from the seed alone.
#[derive(Debug)]
pub struct SeededRng {
    seed: u64,
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_env() -> Self {
        Self::new(seed_from_env())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        f(&mut self.rng.lock())
    }
}
