//! Synthetic test images
//!
//! Small generated images with hand-computable run structure, plus a
//! seeded pseudo-random image for determinism checks.

use crate::error::{TestError, TestResult};
use runmap_core::NdImage;

/// Image with every pixel set to `value`
pub fn uniform<const D: usize>(size: [usize; D], value: f64) -> TestResult<NdImage<f64, D>> {
    Ok(NdImage::new_with_value(size, value)?)
}

/// 2-D image of stripes running along axis 1.
///
/// Pixel `(x, y)` holds `values[(x / period) % 2]`, so every row is a
/// sequence of runs of length `period` and every column is one run.
pub fn stripes_2d(
    width: usize,
    height: usize,
    period: usize,
    values: [f64; 2],
) -> TestResult<NdImage<f64, 2>> {
    if period == 0 {
        return Err(TestError::Generator {
            name: "stripes_2d",
            message: "period must be >= 1".into(),
        });
    }
    Ok(NdImage::from_fn([width, height], |[x, _]| {
        values[(x as usize / period) % 2]
    })?)
}

/// Image of integer levels in `0..levels` drawn from a seeded generator
pub fn noise<const D: usize>(
    size: [usize; D],
    levels: u32,
    seed: u32,
) -> TestResult<NdImage<f64, D>> {
    if levels == 0 {
        return Err(TestError::Generator {
            name: "noise",
            message: "levels must be >= 1".into(),
        });
    }
    let mut rng = SimpleRng::new(seed);
    Ok(NdImage::from_fn(size, |_| {
        (rng.next() >> 33) as f64 % levels as f64
    })?)
}

/// Simple linear congruential generator for reproducible randomness
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    fn next(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }
}
