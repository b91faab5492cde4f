//! CUSUM curve computation.

use accurate::{sum::Kahan, traits::SumAccumulator as _};

/// Arithmetic mean with compensated summation.
#[inline]
pub(crate) fn mean(data: &[f64]) -> f64 {
    let mut total = Kahan::zero();

    for value in data {
        total += *value;
    }

    total.sum() / data.len() as f64
}

/// Fill `curve` with the cumulative sum of deviations from `mean`.
///
/// The curve has one element more than the data, element 0 is always zero.
/// The mean is taken as an argument because bootstrap trials shuffle the
/// data, which leaves the mean unchanged.
#[inline]
pub(crate) fn cusum_into(data: &[f64], mean: f64, curve: &mut Vec<f64>) {
    curve.clear();
    curve.reserve(data.len() + 1);
    curve.push(0.0);

    let mut sum = 0.0;
    for value in data {
        sum += value - mean;
        curve.push(sum);
    }
}

/// The difference between the maximum and minimum value of the curve.
///
/// The comparisons never select a NaN, so a poisoned curve keeps both
/// extremes anchored at the leading zero and the spread collapses to zero.
#[inline]
pub(crate) fn spread(curve: &[f64]) -> f64 {
    let mut min = curve[0];
    let mut max = curve[0];

    for value in &curve[1..] {
        if *value < min {
            min = *value;
        }
        if *value > max {
            max = *value;
        }
    }

    max - min
}

/// Index of the maximum absolute deviation from zero.
///
/// Ties keep the lowest index. Because the curve starts and ends at zero,
/// the peak of a non-degenerate curve is strictly inside it.
#[inline]
pub(crate) fn peak(curve: &[f64]) -> usize {
    let mut index = 0;

    for (candidate, value) in curve.iter().enumerate().skip(1) {
        if value.abs() > curve[index].abs() {
            index = candidate;
        }
    }

    index
}
