//! Whole-region run-length feature statistics
//!
//! Instead of a map, one set of features describes a complete region.
//! Each offset gets its own matrix; the requested features are extracted
//! per offset and summarised by their mean and population standard
//! deviation across offsets. With `fast_calculations` all offsets share a
//! single matrix and every deviation is 0.

use crate::feature::{RunLengthFeature, extract_feature};
use crate::matrix::{RunLengthBinning, RunLengthMatrix, accumulate};
use crate::offsets::{default_offsets, validate_offsets};
use crate::params::{DEFAULT_BINS_PER_AXIS, DEFAULT_INSIDE_VALUE};
use crate::windowed::check_mask_grid;
use crate::{TextureError, TextureResult};
use log::debug;
use runmap_core::{ImageMask, ImageRegion, ImageSource, NoMask, ValueMask};

/// Options for [`region_feature_summary`]
#[derive(Debug, Clone)]
pub struct SummaryOptions<const D: usize> {
    /// Region to describe, the whole image if `None`
    pub region: Option<ImageRegion<D>>,
    /// Run directions
    pub offsets: Vec<[i64; D]>,
    /// Features to report, in output order
    pub features: Vec<RunLengthFeature>,
    /// Bins on each matrix axis
    pub bins_per_axis: usize,
    /// Grey-level range, the image minimum and maximum if `None`
    pub pixel_value_range: Option<(f64, f64)>,
    /// Distance range, `[0, region diagonal]` if `None`
    pub distance_range: Option<(f64, f64)>,
    /// Mask value marking valid pixels (masked variant only)
    pub inside_value: f64,
    /// Merge all offsets into one matrix
    pub fast_calculations: bool,
}

impl<const D: usize> Default for SummaryOptions<D> {
    fn default() -> Self {
        Self {
            region: None,
            offsets: default_offsets(),
            features: RunLengthFeature::ALL.to_vec(),
            bins_per_axis: DEFAULT_BINS_PER_AXIS,
            pixel_value_range: None,
            distance_range: None,
            inside_value: DEFAULT_INSIDE_VALUE,
            fast_calculations: false,
        }
    }
}

/// Mean and deviation of one feature across offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStatistics {
    pub feature: RunLengthFeature,
    pub mean: f64,
    pub std_dev: f64,
}

/// Result of [`region_feature_summary`]
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeatureSummary {
    /// One entry per requested feature, in request order
    pub features: Vec<FeatureStatistics>,
    /// Matrices that held at least one run
    pub matrices_used: usize,
}

impl RegionFeatureSummary {
    /// Statistics of one feature, `None` if it was not requested
    pub fn get(&self, feature: RunLengthFeature) -> Option<&FeatureStatistics> {
        self.features.iter().find(|s| s.feature == feature)
    }

    /// Means in request order
    pub fn means(&self) -> Vec<f64> {
        self.features.iter().map(|s| s.mean).collect()
    }

    /// Standard deviations in request order
    pub fn std_devs(&self) -> Vec<f64> {
        self.features.iter().map(|s| s.std_dev).collect()
    }
}

/// Summarise the run-length features of a region.
///
/// # Errors
///
/// - `TextureError::InvalidParameters` for an empty feature list, a zero
///   bin count, bad ranges, or a region outside the image
/// - `TextureError::EmptyOffsets` / `TextureError::ZeroOffset`
/// - `TextureError::EmptyMatrix` if no offset produced a run
pub fn region_feature_summary<S, const D: usize>(
    source: &S,
    options: &SummaryOptions<D>,
) -> TextureResult<RegionFeatureSummary>
where
    S: ImageSource<D> + ?Sized,
{
    summarize(source, &NoMask, options)
}

/// As [`region_feature_summary`], sampling runs only where `mask` equals
/// `options.inside_value`.
pub fn region_feature_summary_masked<S, K, const D: usize>(
    source: &S,
    mask: &K,
    options: &SummaryOptions<D>,
) -> TextureResult<RegionFeatureSummary>
where
    S: ImageSource<D> + ?Sized,
    K: ImageSource<D> + ?Sized,
{
    summarize(source, &ValueMask::new(mask, options.inside_value), options)
}

fn summarize<S, M, const D: usize>(
    source: &S,
    mask: &M,
    options: &SummaryOptions<D>,
) -> TextureResult<RegionFeatureSummary>
where
    S: ImageSource<D> + ?Sized,
    M: ImageMask<D> + ?Sized,
{
    if options.features.is_empty() {
        return Err(TextureError::InvalidParameters(
            "at least one feature must be requested".into(),
        ));
    }
    validate_offsets(&options.offsets)?;
    check_mask_grid(source, mask)?;

    let info = source.info();
    let region = options.region.unwrap_or(info.region);
    if !info.region.contains_region(&region) {
        return Err(TextureError::InvalidParameters(format!(
            "region {:?} is not inside image region {:?}",
            region, info.region
        )));
    }

    let pixel_range = options
        .pixel_value_range
        .or_else(|| source.value_range())
        .unwrap_or((0.0, 0.0));
    let distance_range = options.distance_range.unwrap_or_else(|| {
        let diagonal = (0..D)
            .map(|d| {
                let extent = region.size()[d].saturating_sub(1) as f64 * info.spacing[d];
                extent * extent
            })
            .sum::<f64>()
            .sqrt();
        (0.0, diagonal)
    });
    let binning = RunLengthBinning::new(options.bins_per_axis, pixel_range, distance_range)?;

    debug!(
        "region_feature_summary: region {:?}, {} offsets, {} features, fast = {}",
        region,
        options.offsets.len(),
        options.features.len(),
        options.fast_calculations
    );

    let matrices: Vec<RunLengthMatrix> = if options.fast_calculations {
        vec![accumulate(source, mask, &region, &options.offsets, &binning)]
    } else {
        options
            .offsets
            .iter()
            .map(|offset| accumulate(source, mask, &region, std::slice::from_ref(offset), &binning))
            .collect()
    };

    let used: Vec<&RunLengthMatrix> = matrices.iter().filter(|m| !m.is_empty()).collect();
    if used.is_empty() {
        return Err(TextureError::EmptyMatrix);
    }
    if used.len() < matrices.len() {
        debug!(
            "region_feature_summary: {} of {} matrices held no run and were skipped",
            matrices.len() - used.len(),
            matrices.len()
        );
    }

    let mut features = Vec::with_capacity(options.features.len());
    for &feature in &options.features {
        let values = used
            .iter()
            .map(|m| extract_feature(m, feature))
            .collect::<TextureResult<Vec<f64>>>()?;
        let (mean, std_dev) = mean_and_std_dev(&values);
        features.push(FeatureStatistics {
            feature,
            mean,
            std_dev,
        });
    }

    Ok(RegionFeatureSummary {
        features,
        matrices_used: used.len(),
    })
}

/// Mean and population standard deviation of a non-empty slice
fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
