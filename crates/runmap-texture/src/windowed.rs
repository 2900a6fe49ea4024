//! Windowed run-length feature maps
//!
//! For every input position whose window fits inside the image, a
//! run-length matrix is accumulated over the window along all configured
//! offsets, one feature is extracted from it and written to the eroded
//! output grid (see [`NeighborhoodGeometry`]).
//!
//! Positions are independent of each other: every window owns its matrix
//! and nothing is carried from one position to the next. The traversal is
//! grouped in lines along axis 0, which is also the granularity of
//! cancellation checks and, with the `parallel` feature, of work items.

use crate::feature::extract_feature;
use crate::geometry::NeighborhoodGeometry;
use crate::matrix::{RunLengthBinning, RunLengthMatrix, accumulate};
use crate::parallel::*;
use crate::params::{EmptyWindowPolicy, RunLengthMapParams};
use crate::{TextureError, TextureResult};
use log::{debug, warn};
use runmap_core::{ImageMask, ImageSink, ImageSource};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Summary of one feature map computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureMapStats {
    /// Output pixels written
    pub pixels: usize,
    /// Output pixels holding the sentinel because their window had no run
    pub empty_windows: usize,
}

struct LineValues {
    values: Vec<f64>,
    empty_windows: usize,
}

pub(crate) fn check_mask_grid<S, M, const D: usize>(source: &S, mask: &M) -> TextureResult<()>
where
    S: ImageSource<D> + ?Sized,
    M: ImageMask<D> + ?Sized,
{
    let Some(grid) = mask.grid() else {
        return Ok(());
    };
    let input = source.info();
    let what = if grid.region != input.region {
        "region"
    } else if grid.spacing != input.spacing {
        "spacing"
    } else if grid.origin != input.origin {
        "origin"
    } else {
        return Ok(());
    };
    Err(TextureError::MaskMismatch {
        what,
        input: input.region.size().to_vec(),
        mask: grid.region.size().to_vec(),
    })
}

fn resolve<S, const D: usize>(
    source: &S,
    params: &RunLengthMapParams<D>,
) -> TextureResult<(NeighborhoodGeometry<D>, RunLengthBinning)>
where
    S: ImageSource<D> + ?Sized,
{
    let geometry = NeighborhoodGeometry::compute(&source.info(), params.radius());
    let input_range = match params.pixel_value_range() {
        Some(_) => None,
        None => source.value_range(),
    };
    let binning = params.resolve_binning(input_range, &geometry)?;
    Ok((geometry, binning))
}

/// Compute a feature map into `sink`.
///
/// The sink is allocated with the eroded output grid before any pixel is
/// evaluated. If the radius leaves no interior position the sink holds a
/// zero-sized image and nothing is iterated.
///
/// # Errors
///
/// - `TextureError::MaskMismatch` if the mask is defined on another grid
///   (checked before allocation)
/// - `TextureError::EmptyWindow` for a window without runs under
///   [`EmptyWindowPolicy::Strict`]
/// - `TextureError::Cancelled` if `cancel` was raised
pub fn compute_feature_map<S, M, K, const D: usize>(
    source: &S,
    mask: &M,
    params: &RunLengthMapParams<D>,
    sink: &mut K,
    cancel: Option<&AtomicBool>,
) -> TextureResult<FeatureMapStats>
where
    S: ImageSource<D> + MaybeSync + ?Sized,
    M: ImageMask<D> + MaybeSync + ?Sized,
    K: ImageSink<D> + ?Sized,
{
    check_mask_grid(source, mask)?;

    let (geometry, binning) = resolve(source, params)?;
    sink.allocate(&geometry.output)?;

    if geometry.is_empty() {
        debug!(
            "compute_feature_map: radius {:?} leaves no interior position, output is empty",
            params.radius()
        );
        return Ok(FeatureMapStats::default());
    }

    debug!(
        "compute_feature_map: {} over {:?} positions, {} offsets, {} bins, grey range {:?}, distance range {:?}",
        params.feature(),
        geometry.input_region.size(),
        params.offsets().len(),
        binning.bins(),
        binning.pixel_range(),
        binning.distance_range()
    );

    let line_len = geometry.input_region.size()[0];
    let starts: Vec<[i64; D]> = geometry.input_region.line_starts(0).iter().collect();
    let completed = AtomicUsize::new(0);

    let evaluate_line = |start: [i64; D]| -> TextureResult<LineValues> {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(TextureError::Cancelled {
                completed_lines: completed.load(Ordering::Relaxed),
            });
        }

        let mut line = LineValues {
            values: Vec::with_capacity(line_len),
            empty_windows: 0,
        };
        let mut center = start;
        for _ in 0..line_len {
            let window = geometry.window(&center);
            let matrix = accumulate(source, mask, &window, params.offsets(), &binning);
            let value = match extract_feature(&matrix, params.feature()) {
                Ok(v) => v,
                Err(TextureError::EmptyMatrix) => match params.empty_window_policy() {
                    EmptyWindowPolicy::Sentinel(s) => {
                        line.empty_windows += 1;
                        s
                    }
                    EmptyWindowPolicy::Strict => {
                        return Err(TextureError::EmptyWindow {
                            index: center.to_vec(),
                        });
                    }
                },
                Err(e) => return Err(e),
            };
            line.values.push(value);
            center[0] += 1;
        }

        completed.fetch_add(1, Ordering::Relaxed);
        Ok(line)
    };

    let lines: Vec<LineValues> = starts
        .clone()
        .into_par_iter()
        .map(evaluate_line)
        .collect::<TextureResult<Vec<_>>>()?;

    let mut stats = FeatureMapStats::default();
    for (start, line) in starts.iter().zip(&lines) {
        sink.write_line(&geometry.output_index(start), &line.values)?;
        stats.pixels += line.values.len();
        stats.empty_windows += line.empty_windows;
    }

    if stats.empty_windows > 0 {
        warn!(
            "compute_feature_map: {} of {} windows held no run, sentinel written",
            stats.empty_windows, stats.pixels
        );
    }
    debug!("compute_feature_map: wrote {} pixels", stats.pixels);

    Ok(stats)
}

/// The run-length matrix a feature map computes for the window centred on
/// `center`, using the same geometry and binning.
///
/// # Errors
///
/// Returns `TextureError::InvalidParameters` if `center` is not an
/// interior position, plus the errors of binning resolution.
pub fn window_matrix<S, M, const D: usize>(
    source: &S,
    mask: &M,
    params: &RunLengthMapParams<D>,
    center: &[i64; D],
) -> TextureResult<RunLengthMatrix>
where
    S: ImageSource<D> + ?Sized,
    M: ImageMask<D> + ?Sized,
{
    check_mask_grid(source, mask)?;
    let (geometry, binning) = resolve(source, params)?;
    if !geometry.input_region.contains(center) {
        return Err(TextureError::InvalidParameters(format!(
            "{:?} is not an interior position of region {:?}",
            center, geometry.input_region
        )));
    }
    let window = geometry.window(center);
    Ok(accumulate(source, mask, &window, params.offsets(), &binning))
}
