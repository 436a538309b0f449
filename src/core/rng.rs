//! Deterministic seeded randomness for dice rolls and deck shuffles.
//!
//! The same seed always produces the same match, which is what makes replay
//! from the action log possible. The ChaCha8 word position gives O(1) state
//! capture regardless of how many values have been drawn.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::dice::DiceColor;

/// Deterministic RNG owned by the match.
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl MatchRng {
    /// Create a new RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Roll a single die: uniform over all eight colors, wildcard included.
    pub fn roll_color(&mut self) -> DiceColor {
        DiceColor::ALL[self.inner.gen_range(0..DiceColor::ALL.len())]
    }

    /// Roll `count` dice.
    pub fn roll_colors(&mut self, count: usize) -> Vec<DiceColor> {
        (0..count).map(|_| self.roll_color()).collect()
    }

    /// Shuffle a slice in place (deck setup).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Capture the current state for serialization.
    #[must_use]
    pub fn state(&self) -> MatchRngState {
        MatchRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a captured state.
    #[must_use]
    pub fn from_state(state: &MatchRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRngState {
    /// Original seed.
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}
