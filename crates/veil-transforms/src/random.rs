//! Run-scoped pseudo-random source.
//!
//! One `RandomSource` exists per run and every random decision (literal
//! routing, generated names, table rotation) draws from it, so seeding it
//! makes a whole run reproducible.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::ops::Range;

/// Prefix of every generated identifier.
pub const IDENTIFIER_PREFIX: &str = "_0x";

/// Generated names use at most this many hex digits after the prefix.
const IDENTIFIER_HEX_LENGTH: usize = 6;

const IDENTIFIER_RANGE: Range<u64> = 10_000..99_999_999;

pub struct RandomSource {
    rng: Box<dyn RngCore>,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Wrap any generator, e.g. a scripted one in tests.
    pub fn from_rng(rng: impl RngCore + 'static) -> Self {
        RandomSource { rng: Box::new(rng) }
    }

    /// Uniform sample in `[0, 1)`.
    pub fn sample_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    pub fn range(&mut self, range: Range<u64>) -> u64 {
        self.rng.gen_range(range)
    }

    /// A fresh identifier such as `_0x3f2a1c`.
    ///
    /// Only the prefix, digits and `a`-`f` are used, so the result is always
    /// a valid identifier and can never collide with a keyword.
    pub fn identifier_name(&mut self) -> String {
        let mut hex = format!("{:x}", self.range(IDENTIFIER_RANGE));
        hex.truncate(IDENTIFIER_HEX_LENGTH);
        format!("{IDENTIFIER_PREFIX}{hex}")
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}
