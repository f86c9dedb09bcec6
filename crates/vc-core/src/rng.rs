//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A run draws every random number (inter-arrival gaps, patient types,
//! service durations) from one `SmallRng` stream.  Because the scheduler
//! executes events in a fixed order, the sequence of draws is fixed too:
//! the same seed and configuration always reproduce the same event log.
//!
//! Without a seed the stream is seeded from OS entropy, which is useful for
//! exploratory runs but not reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG shared by every generator and process of one run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy.  Runs built this way are not reproducible.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// Build from an optional seed, falling back to entropy.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None    => Self::from_entropy(),
        }
    }

    /// Derive the seed of replication `index` from a base seed, so sweep
    /// replications get well-separated streams.
    pub fn replication_seed(base: u64, index: u64) -> u64 {
        base ^ index.wrapping_mul(MIXING_CONSTANT)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Absolute value of one draw from `dist`.
    ///
    /// Durations are drawn from normals whose left tail crosses zero; folding
    /// the negative tail keeps every duration non-negative without a
    /// rejection loop.
    #[inline]
    pub fn half_normal(&mut self, dist: &Normal<f64>) -> f64 {
        dist.sample(&mut self.0).abs()
    }
}
