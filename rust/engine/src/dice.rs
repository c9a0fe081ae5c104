use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::state::{DIE_MAX, DIE_MIN};

/// Source of die values in 1-6. The registry draws from one of these; tests
/// and callers with their own randomness collaborator can substitute theirs.
pub trait DieSource: Send {
    fn roll(&mut self) -> u8;
}

#[derive(Debug)]
pub struct SeededDie {
    rng: ChaCha20Rng,
}

impl SeededDie {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DieSource for SeededDie {
    fn roll(&mut self) -> u8 {
        // unbiased range sampling, not modulo reduction
        self.rng.random_range(DIE_MIN..=DIE_MAX)
    }
}
