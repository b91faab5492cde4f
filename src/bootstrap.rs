//! Bootstrap significance analysis.
//!
//! A bootstrap consists of a large number of trials, each computing the
//! CUSUM spread of a uniformly shuffled copy of the segment, and counting
//! the trials whose spread stays strictly below the observed spread.

use rand::{Rng, SeedableRng as _, rngs::SmallRng, seq::SliceRandom as _};

use crate::curve;

/// Reusable buffers shared by all bootstrap calls of one detection run.
pub(crate) struct Scratch {
    /// CUSUM curve of the unshuffled segment, valid after `count_smaller`.
    pub(crate) curve: Vec<f64>,
    /// Working copy that gets shuffled in place.
    buffer: Vec<f64>,
    /// One seed per trial.
    seeds: Vec<u64>,
}

impl Scratch {
    pub(crate) fn new() -> Self {
        Self {
            curve: Vec::new(),
            buffer: Vec::new(),
            seeds: Vec::new(),
        }
    }
}

/// Amount of shuffled values below which threading is not worth the overhead.
#[cfg(feature = "rayon")]
const PAR_MIN_WORK: usize = 1 << 16;

/// Run the bootstrap analysis on a segment.
///
/// Leaves the observed CUSUM curve in `scratch.curve` and returns how many
/// of `iterations` shuffled trials had a strictly smaller spread. Ties do
/// not count towards significance.
///
/// Every trial gets its own seed drawn from `rng` up front and restarts
/// from the unshuffled segment, so the count is a pure function of the
/// seed stream no matter in which order the trials run.
pub(crate) fn count_smaller<R: Rng>(
    segment: &[f64],
    iterations: usize,
    rng: &mut R,
    scratch: &mut Scratch,
) -> usize {
    let mean = curve::mean(segment);
    curve::cusum_into(segment, mean, &mut scratch.curve);
    let sdiff = curve::spread(&scratch.curve);

    scratch.seeds.clear();
    scratch
        .seeds
        .extend(std::iter::repeat_with(|| rng.next_u64()).take(iterations));

    // Spread across threads when the trial loop dominates
    #[cfg(feature = "rayon")]
    if segment.len().saturating_mul(iterations) >= PAR_MIN_WORK {
        return par_count_smaller(segment, mean, sdiff, &scratch.seeds);
    }

    scratch.buffer.resize(segment.len(), 0.0);

    let mut smaller = 0;
    for seed in &scratch.seeds {
        if trial_spread(segment, mean, *seed, &mut scratch.buffer) < sdiff {
            smaller += 1;
        }
    }

    smaller
}

/// The trial loop of [`count_smaller`], spread across threads.
#[cfg(feature = "rayon")]
fn par_count_smaller(segment: &[f64], mean: f64, sdiff: f64, seeds: &[u64]) -> usize {
    use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};

    seeds
        .par_iter()
        .map_init(
            // One working copy per thread
            || vec![0.0; segment.len()],
            |buffer, seed| trial_spread(segment, mean, *seed, buffer),
        )
        .filter(|diff| *diff < sdiff)
        .count()
}

/// CUSUM spread of one shuffled copy of the segment.
///
/// The extremes are tracked while accumulating, the shuffled curve itself
/// is never materialized. Shuffling leaves the mean unchanged, so the
/// caller's mean applies to every permutation.
#[inline]
fn trial_spread(segment: &[f64], mean: f64, seed: u64, buffer: &mut [f64]) -> f64 {
    buffer.copy_from_slice(segment);

    let mut rng = SmallRng::seed_from_u64(seed);
    buffer.shuffle(&mut rng);

    let mut sum = 0.0;
    let mut min = 0.0;
    let mut max = 0.0;
    for value in buffer.iter() {
        sum += value - mean;
        if sum < min {
            min = sum;
        }
        if sum > max {
            max = sum;
        }
    }

    max - min
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    /// A constant segment has zero spread, no trial can beat it.
    #[test]
    fn constant_never_significant() {
        let segment = [7.5; 32];
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = Scratch::new();

        assert_eq!(count_smaller(&segment, 500, &mut rng, &mut scratch), 0);
        assert_eq!(scratch.curve.len(), segment.len() + 1);
    }

    /// A clean step beats nearly every shuffle.
    #[test]
    fn step_is_significant() {
        let mut segment = [0.0; 40];
        segment[20..].fill(10.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = Scratch::new();

        let smaller = count_smaller(&segment, 1000, &mut rng, &mut scratch);
        assert!(smaller > 950, "only {smaller} of 1000 trials were smaller");
    }

    /// The count only depends on the seed stream.
    #[test]
    fn seeded_runs_repeat() {
        let segment = [1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 2.0, 7.0];

        let mut counts = Vec::new();
        for _ in 0..2 {
            let mut rng = StdRng::seed_from_u64(99);
            let mut scratch = Scratch::new();
            counts.push(count_smaller(&segment, 200, &mut rng, &mut scratch));
        }

        assert_eq!(counts[0], counts[1]);
    }

    /// Zero iterations degenerate to a zero count.
    #[test]
    fn zero_iterations() {
        let segment = [1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = Scratch::new();

        assert_eq!(count_smaller(&segment, 0, &mut rng, &mut scratch), 0);
    }
}
