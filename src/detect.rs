//! Segmentation driver.

use std::{borrow::Cow, iter::FusedIterator, ops::Range};

use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    bootstrap::{self, Scratch},
    curve,
};

/// A sub-segment awaiting a significance decision.
struct Task {
    /// Range into the original data.
    range: Range<usize>,
    /// Translates a local split point into original coordinates.
    ///
    /// A split at the curve origin pushes its right half with the offset
    /// reduced past zero; such a task is dead and dropped when popped.
    offset: isize,
}

/// Lazy producer of changepoint indices.
///
/// Each call to [`Iterator::next`] works through the segment list until a
/// significant split is found or the list runs dry. Indices come out in
/// discovery order, unsorted, and nested splits can land on the same
/// index twice. Dropping the iterator early drops all remaining work.
pub struct Changepoints<'a, R> {
    /// The full input signal, segments are subranges of it.
    data: Cow<'a, [f64]>,
    /// Segments still awaiting a decision.
    tasks: SmallVec<Task, 8>,
    /// Significance threshold as a percentage.
    confidence: f64,
    /// Bootstrap trials per segment.
    iterations: usize,
    /// Seed source for the bootstrap trials.
    rng: R,
    /// Buffers reused across all bootstrap calls.
    scratch: Scratch,
}

impl<'a, R: Rng> Changepoints<'a, R> {
    pub(crate) fn new(data: Cow<'a, [f64]>, confidence: f64, iterations: usize, rng: R) -> Self {
        let mut tasks = SmallVec::new();
        tasks.push(Task {
            range: 0..data.len(),
            offset: 0,
        });

        Self {
            data,
            tasks,
            confidence,
            iterations,
            rng,
            scratch: Scratch::new(),
        }
    }
}

impl<R: Rng> Iterator for Changepoints<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(task) = self.tasks.pop() {
            // Dead branch from an earlier split at the curve origin
            if branches::unlikely(task.offset < 0) {
                continue;
            }

            let segment = &self.data[task.range.clone()];
            // Nothing left to split, and the bootstrap is undefined here
            if branches::unlikely(segment.len() <= 1) {
                continue;
            }

            let smaller = bootstrap::count_smaller(
                segment,
                self.iterations,
                &mut self.rng,
                &mut self.scratch,
            );
            let significance = smaller as f64 / self.iterations as f64 * 100.0;

            if significance <= self.confidence {
                debug!(
                    start = task.range.start,
                    len = segment.len(),
                    significance,
                    "segment accepted as homogeneous"
                );
                continue;
            }

            // Most likely shift location, strictly inside a non-zero curve
            let local = curve::peak(&self.scratch.curve);
            let split = task.range.start + local;
            let index = (local as isize + task.offset) as usize;

            debug!(
                start = task.range.start,
                len = segment.len(),
                significance,
                index,
                "split found"
            );

            self.tasks.push(Task {
                range: task.range.start..split,
                offset: task.offset,
            });
            self.tasks.push(Task {
                range: split..task.range.end,
                offset: task.offset + local as isize - 1,
            });

            return Some(index);
        }

        None
    }
}

impl<R: Rng> FusedIterator for Changepoints<'_, R> {}
