//! Detect the shift points of a noisy three-level signal.

use cusum::Cusum;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

fn main() -> Result<(), cusum::Error> {
    let mut rng = StdRng::seed_from_u64(1);

    // Three regimes with means 0, 5 and 2
    let mut signal = Vec::new();
    for (len, level) in [(60, 0.0), (60, 5.0), (60, 2.0)] {
        for _ in 0..len {
            signal.push(level + rng.gen_range(-0.5..0.5));
        }
    }

    let found = Cusum::new().with_seed(0).detect_sorted(signal.as_slice())?;

    println!("changepoints: {found:?}");

    Ok(())
}
