//! Benchmark different signal sizes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cusum::Cusum;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

/// Noisy signal with a single mean shift in the middle.
fn step_signal(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0);

    (0..len)
        .map(|index| {
            let level = if index < len / 2 { 0.0 } else { 4.0 };
            level + rng.gen_range(-1.0..1.0)
        })
        .collect()
}

/// Full detection over growing signals, trial count held constant.
fn detection(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("detect");

    for len in [64, 256, 1024] {
        let signal = step_signal(len);

        group.bench_with_input(BenchmarkId::from_parameter(len), &signal, |bencher, signal| {
            bencher.iter(|| {
                let found = Cusum::new()
                    .with_seed(0)
                    .with_iterations(100)
                    .detect_sorted(black_box(signal.as_slice()))
                    .expect("valid configuration");

                black_box(found)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, detection);
criterion_main!(benches);
