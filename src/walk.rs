//! Walk state: the persisted traversal tuple and its step generation
//!
//! A walk over a collection of length L advances by a fixed step coprime to
//! L, so repeated advances visit every index exactly once before repeating.
//! The tuple `{position, step, saved_count}` is what gets persisted under
//! the session key; everything here is pure arithmetic with no storage
//! access.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Primes used to assemble a step coprime to the collection length.
///
/// Any length L >= 2 has at least one of these primes not dividing it, and
/// every factor multiplied into the accumulator is coprime to L, so the
/// product stays coprime to L under reduction mod L.
pub const STEP_PRIMES: [usize; 8] = [2, 3, 5, 7, 11, 13, 17, 19];

/// Persisted walk state for one session
///
/// The record carries its own key so the storage port can index it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkState {
    /// Session key this walk belongs to
    pub key: String,
    /// Current index into the item sequence, always in `[0, len)`
    pub position: usize,
    /// Traversal increment, coprime to the sequence length (0 when len = 1)
    pub step: usize,
    /// Number of distinct items that have a rating
    pub saved_count: usize,
}

impl WalkState {
    /// Generate a fresh walk for a collection of `len` items
    ///
    /// The position is uniform over `[0, len)`. The step multiplies
    /// `p^e mod len` into an accumulator for each prime p in [`STEP_PRIMES`]
    /// not dividing `len`, with e uniform over `[0, 4)`, which guarantees
    /// `gcd(step, len) = 1` for all `len >= 2`. For `len = 1` every step is
    /// congruent to 0 and the single item is always current.
    ///
    /// The RNG is deliberately non-cryptographic; callers wanting
    /// reproducible walks pass a seeded [`rand::rngs::SmallRng`].
    ///
    /// Callers must ensure `len >= 1`.
    pub fn generate(key: impl Into<String>, len: usize, rng: &mut impl Rng) -> Self {
        let key = key.into();
        let position = rng.random_range(0..len);

        let mut step = 1 % len;
        for p in STEP_PRIMES {
            if len % p != 0 {
                let e = rng.random_range(0..4u32);
                // Multiply one prime factor at a time, reducing mod len
                // after each, so the accumulator never exceeds len * 19.
                for _ in 0..e {
                    step = step * p % len;
                }
            }
        }

        debug!(%key, len, position, step, "generated walk state");
        Self {
            key,
            position,
            step,
            saved_count: 0,
        }
    }

    /// Move the position forward by one step, wrapping at `len`
    pub fn advance(&mut self, len: usize) {
        self.position = (self.position + self.step) % len;
    }

    /// Move the position backward by one step, wrapping at `len`
    ///
    /// Exact inverse of [`advance`](Self::advance) for any state: relies on
    /// `step < len`, which generation and reduction maintain.
    pub fn retreat(&mut self, len: usize) {
        self.position = (self.position + len - self.step) % len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 { a } else { gcd(b, a % b) }
    }

    fn walk(len: usize, seed: u64) -> WalkState {
        let mut rng = SmallRng::seed_from_u64(seed);
        WalkState::generate("test", len, &mut rng)
    }

    #[test]
    fn test_generate_position_in_range() {
        for seed in 0..50 {
            let w = walk(7, seed);
            assert!(w.position < 7);
            assert_eq!(w.saved_count, 0);
        }
    }

    #[test]
    fn test_generate_step_for_len_4() {
        // Residues mod 4 coprime to 4 are exactly {1, 3}
        for seed in 0..100 {
            let w = walk(4, seed);
            assert!(w.step == 1 || w.step == 3, "step was {}", w.step);
        }
    }

    #[test]
    fn test_generate_single_item() {
        let w = walk(1, 42);
        assert_eq!(w.position, 0);
        assert_eq!(w.step, 0);
        let mut w = w;
        w.advance(1);
        assert_eq!(w.position, 0);
        w.retreat(1);
        assert_eq!(w.position, 0);
    }

    #[test]
    fn test_retreat_undoes_advance() {
        for seed in 0..20 {
            let mut w = walk(12, seed);
            let start = w.position;
            w.advance(12);
            w.retreat(12);
            assert_eq!(w.position, start);
            w.retreat(12);
            w.advance(12);
            assert_eq!(w.position, start);
        }
    }

    #[test]
    fn test_full_cycle_visits_every_position() {
        for seed in 0..20 {
            let mut w = walk(30, seed);
            let start = w.position;
            let mut seen = vec![false; 30];
            for _ in 0..30 {
                assert!(!seen[w.position], "revisited {} early", w.position);
                seen[w.position] = true;
                w.advance(30);
            }
            assert_eq!(w.position, start);
            assert!(seen.iter().all(|&v| v));
        }
    }

    #[test]
    fn test_spec_scenario_len_4_step_3() {
        let mut w = WalkState {
            key: "scenario".to_string(),
            position: 2,
            step: 3,
            saved_count: 0,
        };
        let mut positions = Vec::new();
        for _ in 0..4 {
            w.advance(4);
            positions.push(w.position);
        }
        assert_eq!(positions, vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_serde_round_trip() {
        let w = walk(9, 7);
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["key"], "test");
        let back: WalkState = serde_json::from_value(json).unwrap();
        assert_eq!(back, w);
    }

    proptest! {
        #[test]
        fn prop_step_coprime_to_len(len in 2usize..512, seed in 0u64..u64::MAX) {
            let w = walk(len, seed);
            prop_assert!(w.step >= 1);
            prop_assert!(w.step < len);
            prop_assert_eq!(gcd(w.step, len), 1);
        }

        #[test]
        fn prop_advance_retreat_identity(len in 1usize..512, seed in 0u64..u64::MAX, pos in 0usize..512) {
            let mut w = walk(len, seed);
            w.position = pos % len;
            let start = w.position;
            w.advance(len);
            w.retreat(len);
            prop_assert_eq!(w.position, start);
        }
    }
}
