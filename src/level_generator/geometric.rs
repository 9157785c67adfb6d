//! Geometric level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The default cap on the number of levels a skiplist may grow to.
pub const DEFAULT_TOTAL: usize = 32;

/// The default promotion probability, giving an expected tower height of 2.
pub const DEFAULT_P: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The probability `p` must be in the range `(0, 1)`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `n`,
/// then the probability that it is present at level `n + 1` is some constant
/// `p` in `(0, 1)`. The distribution is capped rather than truncated: any
/// draw that would exceed the top level lands on the top level, so the
/// probabilities of the lower levels are exactly those of the untruncated
/// geometric distribution.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// The generator is seeded from the thread-local entropy source; use
    /// [`with_seed`][Geometric::with_seed] for reproducible draws.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be at least 1.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a new geometric level generator whose draws are fully
    /// determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`new`][Geometric::new].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// The probability that a node is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Geometric {
            total: DEFAULT_TOTAL,
            p: DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// Each additional level is a Bernoulli trial with success probability
    /// `p`, stopping at the first failure or at `total - 1`.
    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}
