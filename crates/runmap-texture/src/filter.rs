//! Run-length feature map filter
//!
//! [`RunLengthFeatureMapFilter`] holds borrowed inputs together with a
//! [`RunLengthMapParams`] store and caches its last output. The output is
//! recomputed by [`update`](RunLengthFeatureMapFilter::update) only after
//! an input or a parameter changed.
//!
//! For one-shot use, [`run_length_feature_map`] and
//! [`run_length_feature_map_masked`] compute a map directly.
//!
//! # Examples
//!
//! ```
//! use runmap_core::NdImage;
//! use runmap_texture::{RunLengthFeature, RunLengthFeatureMapFilter};
//!
//! let image = NdImage::<u8, 2>::from_fn([16, 16], |[x, y]| ((x / 4 + y) % 3) as u8).unwrap();
//!
//! let mut filter = RunLengthFeatureMapFilter::new();
//! filter.set_input(&image);
//! filter.params_mut().set_radius([2, 2]);
//! filter.params_mut().set_feature(RunLengthFeature::LongRunEmphasis);
//!
//! let map = filter.update().unwrap();
//! assert_eq!(map.image.size(), [12, 12]);
//! ```

use crate::params::RunLengthMapParams;
use crate::parallel::MaybeSync;
use crate::windowed::{FeatureMapStats, compute_feature_map};
use crate::{TextureError, TextureResult};
use log::debug;
use runmap_core::{ImageSource, NdImage, NoMask, ValueMask};
use std::sync::atomic::AtomicBool;

/// Output of a feature map computation
#[derive(Debug, Clone)]
pub struct FeatureMap<const D: usize> {
    /// Feature values on the eroded grid
    pub image: NdImage<f64, D>,
    /// Pixel counts of the run
    pub stats: FeatureMapStats,
}

type DynSource<'a, const D: usize> = &'a (dyn ImageSource<D> + Sync);

#[derive(Debug)]
struct CachedOutput<const D: usize> {
    key: (u64, u64),
    map: FeatureMap<D>,
}

/// Windowed run-length feature map with cached output
pub struct RunLengthFeatureMapFilter<'a, const D: usize> {
    input: Option<DynSource<'a, D>>,
    mask: Option<DynSource<'a, D>>,
    params: RunLengthMapParams<D>,
    cancel: Option<&'a AtomicBool>,
    inputs_modified: u64,
    cache: Option<CachedOutput<D>>,
}

impl<const D: usize> Default for RunLengthFeatureMapFilter<'_, D> {
    fn default() -> Self {
        Self {
            input: None,
            mask: None,
            params: RunLengthMapParams::default(),
            cancel: None,
            inputs_modified: 0,
            cache: None,
        }
    }
}

impl<'a, const D: usize> RunLengthFeatureMapFilter<'a, D> {
    /// Filter with default parameters and no input
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter using the given parameters
    pub fn with_params(params: RunLengthMapParams<D>) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Set the image to compute the map of
    pub fn set_input<S: ImageSource<D> + Sync>(&mut self, input: &'a S) {
        debug!("RunLengthFeatureMapFilter: input set");
        self.input = Some(input);
        self.inputs_modified += 1;
    }

    /// Restrict runs to pixels where `mask` equals the inside value
    pub fn set_mask<S: ImageSource<D> + Sync>(&mut self, mask: &'a S) {
        debug!("RunLengthFeatureMapFilter: mask set");
        self.mask = Some(mask);
        self.inputs_modified += 1;
    }

    /// Let every pixel take part in runs
    pub fn clear_mask(&mut self) {
        if self.mask.take().is_some() {
            debug!("RunLengthFeatureMapFilter: mask cleared");
            self.inputs_modified += 1;
        }
    }

    /// True if a mask is set
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Parameters
    pub fn params(&self) -> &RunLengthMapParams<D> {
        &self.params
    }

    /// Mutable parameters; any accepted change invalidates the output
    pub fn params_mut(&mut self) -> &mut RunLengthMapParams<D> {
        &mut self.params
    }

    /// Flag polled once per output line; raising it aborts `update`
    pub fn set_cancel_flag(&mut self, flag: Option<&'a AtomicBool>) {
        self.cancel = flag;
    }

    fn key(&self) -> (u64, u64) {
        (self.inputs_modified, self.params.modified_count())
    }

    /// True if the cached output does not reflect the current inputs and
    /// parameters
    pub fn is_stale(&self) -> bool {
        self.cache.as_ref().is_none_or(|c| c.key != self.key())
    }

    /// Bring the output up to date and return it.
    ///
    /// # Errors
    ///
    /// `TextureError::MissingInput` if no input image was set, plus every
    /// error of [`compute_feature_map`]. A failed update leaves no output.
    pub fn update(&mut self) -> TextureResult<&FeatureMap<D>> {
        if self.is_stale() {
            self.cache = None;
            let map = self.compute()?;
            self.cache = Some(CachedOutput {
                key: self.key(),
                map,
            });
        } else {
            debug!("RunLengthFeatureMapFilter: output up to date");
        }
        self.cache
            .as_ref()
            .map(|c| &c.map)
            .ok_or(TextureError::MissingInput("input image"))
    }

    fn compute(&self) -> TextureResult<FeatureMap<D>> {
        let input = self.input.ok_or(TextureError::MissingInput("input image"))?;
        let mut image = NdImage::<f64, D>::new([0; D])?;
        let stats = match self.mask {
            Some(mask) => compute_feature_map(
                input,
                &ValueMask::new(mask, self.params.inside_value()),
                &self.params,
                &mut image,
                self.cancel,
            )?,
            None => compute_feature_map(input, &NoMask, &self.params, &mut image, self.cancel)?,
        };
        Ok(FeatureMap { image, stats })
    }

    /// The output of the last update, if inputs and parameters are
    /// unchanged since
    pub fn output(&self) -> Option<&FeatureMap<D>> {
        if self.is_stale() {
            return None;
        }
        self.cache.as_ref().map(|c| &c.map)
    }

    /// Move the cached output out of the filter
    pub fn take_output(&mut self) -> Option<FeatureMap<D>> {
        self.cache.take().map(|c| c.map)
    }
}

/// Compute a feature map of `input` over every pixel.
pub fn run_length_feature_map<S, const D: usize>(
    input: &S,
    params: &RunLengthMapParams<D>,
) -> TextureResult<FeatureMap<D>>
where
    S: ImageSource<D> + MaybeSync + ?Sized,
{
    let mut image = NdImage::<f64, D>::new([0; D])?;
    let stats = compute_feature_map(input, &NoMask, params, &mut image, None)?;
    Ok(FeatureMap { image, stats })
}

/// Compute a feature map of `input`, sampling runs only where `mask`
/// equals the inside value of `params`.
///
/// # Errors
///
/// `TextureError::MaskMismatch` if `mask` is not on the grid of `input`.
pub fn run_length_feature_map_masked<S, K, const D: usize>(
    input: &S,
    mask: &K,
    params: &RunLengthMapParams<D>,
) -> TextureResult<FeatureMap<D>>
where
    S: ImageSource<D> + MaybeSync + ?Sized,
    K: ImageSource<D> + MaybeSync + ?Sized,
{
    let mut image = NdImage::<f64, D>::new([0; D])?;
    let mask = ValueMask::new(mask, params.inside_value());
    let stats = compute_feature_map(input, &mask, params, &mut image, None)?;
    Ok(FeatureMap { image, stats })
}
