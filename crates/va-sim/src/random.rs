//! Seeded randomness for fault decisions.
//!
//! Xoshiro256** produces identical sequences for identical seeds, so a
//! simulated run can be replayed exactly.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Deterministic random number generator.
///
/// ```rust
/// use va_sim::DeterministicRng;
///
/// let mut a = DeterministicRng::new(7);
/// let mut b = DeterministicRng::new(7);
/// assert_eq!(a.gen_range(0..100u32), b.gen_range(0..100u32));
/// ```
pub struct DeterministicRng {
    seed: u64,
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

impl DeterministicRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero for better randomness");

        Self {
            seed,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    /// Draw a value in `range`.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.calls_count += 1;
        self.rng.gen_range(range)
    }

    /// `true` with the given probability.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0.0, 1.0]"
        );
        self.calls_count += 1;
        self.rng.gen_bool(probability)
    }

    /// Pick one element of a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        self.calls_count += 1;
        slice.choose(&mut self.rng)
    }

    /// Derive an independent generator, e.g. one per simulated run.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.calls_count += 1;
        let seed = self.rng.gen::<u64>() | 1;
        Self::new(seed)
    }
}
