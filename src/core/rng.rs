//! Deterministic random number generation for battles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical battles
//! - **Forkable**: Independent branches for enemy generation and combat
//! - **Serializable**: O(1) state capture and restore
//! - **Context streams**: Pure per-purpose sequences (the AI planner draws
//!   from `for_context("planner:<turn>")` so planning never advances the
//!   battle stream)
//!
//! ```
//! use creature_battle::core::BattleRng;
//!
//! let mut rng = BattleRng::new(42);
//! let roll = rng.gen_unit();
//! assert!((0.0..1.0).contains(&roll));
//!
//! // Context streams are a pure function of seed and label.
//! let mut a = rng.for_context("planner:3");
//! let mut b = BattleRng::new(42).for_context("planner:3");
//! assert_eq!(a.gen_unit(), b.gen_unit());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backing every random roll in a battle.
///
/// Uses ChaCha8 for speed while keeping sequences reproducible from a seed.
#[derive(Clone, Debug)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl BattleRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Split off an independent stream, e.g. for enemy generation.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// A stream keyed on the seed and `context` only. How far `self` has
    /// advanced does not matter.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
            fork_counter: 0,
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform float in `[low, high)`.
    pub fn gen_between(&mut self, low: f64, high: f64) -> f64 {
        low + self.gen_unit() * (high - low)
    }

    /// Uniform integer in `range`.
    pub fn gen_range_inclusive(&mut self, range: std::ops::RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// `true` with `probability`, clamped into `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Index drawn in proportion to `weights` (any positive scale).
    /// `None` when every weight is zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_unit() * total;

        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if weight > 0.0 && threshold <= 0.0 {
                return Some(i);
            }
        }

        // rounding left a remainder
        weights.iter().rposition(|&w| w > 0.0)
    }

    /// Checkpoint of the stream position.
    #[must_use]
    pub fn state(&self) -> BattleRngState {
        BattleRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    #[must_use]
    pub fn from_state(state: &BattleRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state for in-session checkpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRngState {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = BattleRng::new(42);
        let mut rng2 = BattleRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_unit(), rng2.gen_unit());
        }
    }

    #[test]
    fn test_gen_between_bounds() {
        let mut rng = BattleRng::new(9);
        for _ in 0..1000 {
            let v = rng.gen_between(0.85, 1.15);
            assert!((0.85..1.15).contains(&v));
        }
    }

    #[test]
    fn test_fork_produces_different_sequence() {
        let mut rng = BattleRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_ignores_advancement() {
        let mut advanced = BattleRng::new(42);
        for _ in 0..50 {
            advanced.gen_unit();
        }
        let fresh = BattleRng::new(42);

        let mut ctx1 = advanced.for_context("planner:1");
        let mut ctx2 = fresh.for_context("planner:1");
        for _ in 0..10 {
            assert_eq!(ctx1.gen_unit(), ctx2.gen_unit());
        }
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = BattleRng::new(42);

        let weights = [0.0, 100.0, 0.0];
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_gen_bool_clamps() {
        let mut rng = BattleRng::new(1);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = BattleRng::new(42);
        for _ in 0..100 {
            rng.gen_unit();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..1000)).collect();

        let mut restored = BattleRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range_usize(0..1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = BattleRngState {
            seed: 42,
            word_pos: 12345,
            fork_counter: 5,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: BattleRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
