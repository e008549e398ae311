//! Deterministic random number generation.
//!
//! The engine itself is deterministic. Randomness is only consumed by
//! optional match configuration:
//!
//! - dealing a hand from a deck larger than the hand size
//! - scattering elemental affinities over board cells
//!
//! Each use draws from its own context stream so that enabling one option
//! never changes the outcome of the other.
//!
//! ```
//! use grid_duel::core::GameRng;
//!
//! let mut deal: Vec<u32> = (0..8).collect();
//! let mut again = deal.clone();
//! GameRng::new(42).for_context("deal").shuffle(&mut deal);
//! GameRng::new(42).for_context("deal").shuffle(&mut again);
//! assert_eq!(deal, again);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG.
///
/// Uses ChaCha8. Only the seed is ever persisted: every stream the engine
/// draws from is derived from it with `for_context`.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same seed and context always produce the same stream. The
    /// context seed is mixed with FNV-1a so it is stable across Rust
    /// releases and platforms.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in self.seed.to_le_bytes().iter().chain(context.as_bytes()) {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Self::new(hash)
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// Probabilities outside `[0, 1]` are clamped; NaN is never true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
