//! Grey-level run-length matrices
//!
//! A run is a maximal chain of pixels, stepping by an offset vector, whose
//! values fall in the same grey-level bin. The matrix counts runs by
//! (grey-level bin, run-length bin). Run length is the physical distance
//! between the two end points of the run, so a one-pixel run has length 0.
//!
//! Several offsets accumulate into a single matrix; runs are direction
//! symmetric, so an offset and its negation yield the same runs.

use crate::{TextureError, TextureResult};
use runmap_core::{ImageInfo, ImageMask, ImageRegion, ImageSource};

/// Uniform binning of both matrix axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLengthBinning {
    bins: usize,
    pixel_min: f64,
    pixel_max: f64,
    distance_min: f64,
    distance_max: f64,
}

impl RunLengthBinning {
    /// Create a binning with `bins` bins per axis
    ///
    /// # Errors
    ///
    /// Returns `TextureError::InvalidParameters` if `bins` is 0, a bound
    /// is not finite, a minimum exceeds its maximum, or the distance
    /// minimum is negative.
    pub fn new(bins: usize, pixel_range: (f64, f64), distance_range: (f64, f64)) -> TextureResult<Self> {
        if bins == 0 {
            return Err(TextureError::InvalidParameters(
                "bins per axis must be >= 1".into(),
            ));
        }
        check_range("pixel value", pixel_range)?;
        check_range("distance", distance_range)?;
        if distance_range.0 < 0.0 {
            return Err(TextureError::InvalidParameters(format!(
                "distance minimum must be >= 0, got {}",
                distance_range.0
            )));
        }
        Ok(Self {
            bins,
            pixel_min: pixel_range.0,
            pixel_max: pixel_range.1,
            distance_min: distance_range.0,
            distance_max: distance_range.1,
        })
    }

    /// Number of bins per axis
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Grey-level range `(min, max)`
    pub fn pixel_range(&self) -> (f64, f64) {
        (self.pixel_min, self.pixel_max)
    }

    /// Run-length distance range `(min, max)`
    pub fn distance_range(&self) -> (f64, f64) {
        (self.distance_min, self.distance_max)
    }

    /// Grey-level bin of a pixel value, `None` outside the range
    #[inline]
    pub fn pixel_bin(&self, value: f64) -> Option<usize> {
        bin_of(value, self.pixel_min, self.pixel_max, self.bins)
    }

    /// Run-length bin of a distance, `None` outside the range
    #[inline]
    pub fn distance_bin(&self, distance: f64) -> Option<usize> {
        bin_of(distance, self.distance_min, self.distance_max, self.bins)
    }
}

pub(crate) fn check_range(what: &str, (min, max): (f64, f64)) -> TextureResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(TextureError::InvalidParameters(format!(
            "{what} range must be finite, got [{min}, {max}]"
        )));
    }
    if min > max {
        return Err(TextureError::InvalidParameters(format!(
            "{what} minimum {min} exceeds maximum {max}"
        )));
    }
    Ok(())
}

#[inline]
fn bin_of(value: f64, min: f64, max: f64, bins: usize) -> Option<usize> {
    if !(value >= min && value <= max) {
        return None;
    }
    if max <= min {
        return Some(0);
    }
    let bin = ((value - min) / (max - min) * bins as f64).floor() as usize;
    Some(bin.min(bins - 1))
}

/// Run counts by (grey-level bin, run-length bin)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengthMatrix {
    bins: usize,
    counts: Vec<u64>,
    total: u64,
}

impl RunLengthMatrix {
    /// Create an empty `bins x bins` matrix
    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            counts: vec![0; bins * bins],
            total: 0,
        }
    }

    /// Bins per axis
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Count of runs in grey bin `grey` and length bin `length`
    #[inline]
    pub fn get(&self, grey: usize, length: usize) -> u64 {
        if grey >= self.bins || length >= self.bins {
            return 0;
        }
        self.counts[grey * self.bins + length]
    }

    /// Add one run
    ///
    /// # Panics
    ///
    /// Panics if a bin index is out of range.
    #[inline]
    pub fn increment(&mut self, grey: usize, length: usize) {
        assert!(grey < self.bins && length < self.bins, "bin out of range");
        self.counts[grey * self.bins + length] += 1;
        self.total += 1;
    }

    /// Total number of runs
    #[inline]
    pub fn total_runs(&self) -> u64 {
        self.total
    }

    /// True if no run was counted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Add every count of `other` (same bin count required)
    pub fn merge(&mut self, other: &RunLengthMatrix) -> TextureResult<()> {
        if other.bins != self.bins {
            return Err(TextureError::InvalidParameters(format!(
                "cannot merge {} bin matrix into {} bin matrix",
                other.bins, self.bins
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.total += other.total;
        Ok(())
    }

    /// Runs per grey-level bin
    pub fn grey_level_marginal(&self) -> Vec<u64> {
        self.counts
            .chunks(self.bins.max(1))
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Runs per run-length bin
    pub fn run_length_marginal(&self) -> Vec<u64> {
        let mut marginal = vec![0u64; self.bins];
        for row in self.counts.chunks(self.bins.max(1)) {
            for (m, &c) in marginal.iter_mut().zip(row) {
                *m += c;
            }
        }
        marginal
    }

    /// Iterate `(grey bin, length bin, count)` over non-zero cells
    pub fn nonzero_cells(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        let bins = self.bins;
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(move |(k, &c)| (k / bins, k % bins, c))
    }
}

/// Accumulate the runs of `region` along every offset into one matrix.
///
/// Pixels outside `mask`, outside the grey-level range, or outside the
/// source are never part of a run. Runs end at the region border; the
/// region is a view, nothing is copied.
pub fn accumulate<S, M, const D: usize>(
    source: &S,
    mask: &M,
    region: &ImageRegion<D>,
    offsets: &[[i64; D]],
    binning: &RunLengthBinning,
) -> RunLengthMatrix
where
    S: ImageSource<D> + ?Sized,
    M: ImageMask<D> + ?Sized,
{
    let mut matrix = RunLengthMatrix::new(binning.bins());
    if region.is_empty() {
        return matrix;
    }

    let info = source.info();
    let mut visited = vec![false; region.num_pixels()];

    for offset in offsets {
        if offset.iter().all(|&o| o == 0) {
            continue;
        }
        visited.fill(false);
        accumulate_offset(
            source,
            mask,
            region,
            &info,
            offset,
            binning,
            &mut visited,
            &mut matrix,
        );
    }

    matrix
}

#[allow(clippy::too_many_arguments)]
fn accumulate_offset<S, M, const D: usize>(
    source: &S,
    mask: &M,
    region: &ImageRegion<D>,
    info: &ImageInfo<D>,
    offset: &[i64; D],
    binning: &RunLengthBinning,
    visited: &mut [bool],
    matrix: &mut RunLengthMatrix,
) where
    S: ImageSource<D> + ?Sized,
    M: ImageMask<D> + ?Sized,
{
    // Grey bin of a pixel that may be part of a run
    let sample = |index: &[i64; D]| -> Option<usize> {
        if !mask.is_inside(index) {
            return None;
        }
        source.value_at(index).and_then(|v| binning.pixel_bin(v))
    };

    for (k, start) in region.iter().enumerate() {
        if visited[k] {
            continue;
        }
        let Some(grey) = sample(&start) else {
            continue;
        };
        visited[k] = true;

        let forward_end = walk(region, &start, offset, 1, grey, &sample, visited);
        let backward_end = walk(region, &start, offset, -1, grey, &sample, visited);

        let distance = info.physical_distance(&forward_end, &backward_end);
        if let Some(length) = binning.distance_bin(distance) {
            matrix.increment(grey, length);
        }
    }
}

/// Follow a run from `start` in direction `sign * offset`, marking pixels
/// visited, and return its last index.
fn walk<F, const D: usize>(
    region: &ImageRegion<D>,
    start: &[i64; D],
    offset: &[i64; D],
    sign: i64,
    grey: usize,
    sample: &F,
    visited: &mut [bool],
) -> [i64; D]
where
    F: Fn(&[i64; D]) -> Option<usize>,
{
    let mut last = *start;
    loop {
        let mut next = last;
        for d in 0..D {
            next[d] += sign * offset[d];
        }
        let Some(k) = region.linear_offset(&next) else {
            break;
        };
        if sample(&next) != Some(grey) {
            break;
        }
        visited[k] = true;
        last = next;
    }
    last
}
