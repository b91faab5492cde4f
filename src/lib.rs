//! Changepoint detection with CUSUM and bootstrap analysis.
//!
//! Detects abrupt shifts in the mean of an ordered signal. The CUSUM
//! curve of a segment accumulates deviations from the segment mean; a
//! genuine shift makes its spread larger than the spreads of randomly
//! shuffled copies, which is what the bootstrap analysis measures. When a
//! segment tests significant it is split at the curve's absolute peak and
//! both halves are examined again, until every remaining segment looks
//! homogeneous.
//!
//! ```
//! use cusum::Cusum;
//!
//! let mut signal = vec![1.0; 40];
//! signal[20..].fill(6.0);
//!
//! let found = Cusum::new()
//!     .with_seed(42)
//!     .detect_sorted(signal.as_slice())?;
//! assert_eq!(found, vec![20]);
//! # Ok::<(), cusum::Error>(())
//! ```
//!
//! Signals containing non-finite values are handled consistently: a NaN
//! or infinity poisons the segment mean, the observed spread collapses to
//! zero and the segment is never split.

mod bootstrap;
mod curve;
mod detect;
mod error;

use std::borrow::Cow;

pub use detect::Changepoints;
pub use error::Error;
use ndarray::{ArrayView1, AsArray, Ix1};
use rand::{Rng, SeedableRng as _, rngs::StdRng};

/// CUSUM changepoint detector.
///
/// # Defaults
///
/// - `confidence`: `95.0`
/// - `iterations`: `1000`
/// - unseeded, randomness from OS entropy
#[derive(Debug, Clone, Copy)]
pub struct Cusum {
    /// Significance threshold as a percentage.
    confidence: f64,
    /// Bootstrap trials per segment.
    iterations: usize,
    /// Fixed seed for reproducible runs.
    seed: Option<u64>,
}

impl Cusum {
    /// Construct a new detector with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            confidence: 95.0,
            iterations: 1000,
            seed: None,
        }
    }

    /// Set the significance threshold, a percentage.
    ///
    /// A segment is only split when the estimated probability of a genuine
    /// shift exceeds this value. The value is not validated: below zero
    /// every segment splits until nothing splittable remains, at or above
    /// one hundred nothing ever splits. Both follow directly from the
    /// threshold's mathematical meaning.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;

        self
    }

    /// Set the number of bootstrap trials per segment.
    ///
    /// More trials tighten the significance estimate at linearly higher
    /// cost.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;

        self
    }

    /// Fix the seed of the permutation source, making runs reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);

        self
    }

    /// Detect changepoints in a signal.
    ///
    /// Returns a lazy iterator over 0-based indices of the first sample of
    /// each new regime, in discovery order. Indices are neither sorted nor
    /// deduplicated, see [`Self::detect_sorted`]. Signals of length 0 or 1
    /// yield an empty iterator.
    ///
    /// # Errors
    ///
    /// - When the iteration count is zero.
    pub fn detect<'a>(
        &self,
        signal: impl AsArray<'a, f64, Ix1>,
    ) -> Result<Changepoints<'a, StdRng>, Error> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.detect_with_rng(signal, rng)
    }

    /// Detect changepoints drawing all randomness from `rng`.
    ///
    /// # Errors
    ///
    /// - When the iteration count is zero.
    pub fn detect_with_rng<'a, R: Rng>(
        &self,
        signal: impl AsArray<'a, f64, Ix1>,
        rng: R,
    ) -> Result<Changepoints<'a, R>, Error> {
        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }

        let view: ArrayView1<'a, f64> = signal.into();
        // Contiguous views are borrowed, strided ones copied once
        let data = match view.to_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(view.to_vec()),
        };

        Ok(Changepoints::new(data, self.confidence, self.iterations, rng))
    }

    /// Detect changepoints and return them sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// - When the iteration count is zero.
    pub fn detect_sorted<'a>(&self, signal: impl AsArray<'a, f64, Ix1>) -> Result<Vec<usize>, Error> {
        let mut indices = self.detect(signal)?.collect::<Vec<_>>();

        indices.sort_unstable();
        indices.dedup();

        Ok(indices)
    }
}

impl Default for Cusum {
    fn default() -> Self {
        Self::new()
    }
}
