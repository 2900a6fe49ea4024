//! Parameters of the windowed run-length feature map
//!
//! Every setter validates its argument; a rejected value leaves the store
//! unchanged. Accepted changes bump a modification counter that cached
//! outputs are checked against.

use crate::feature::RunLengthFeature;
use crate::geometry::NeighborhoodGeometry;
use crate::matrix::{RunLengthBinning, check_range};
use crate::offsets::{default_offsets, validate_offsets};
use crate::{TextureError, TextureResult};
use log::debug;

/// Default window half-width on every axis
pub const DEFAULT_RADIUS: usize = 2;
/// Default number of bins on each matrix axis
pub const DEFAULT_BINS_PER_AXIS: usize = 256;
/// Default mask value marking valid pixels
pub const DEFAULT_INSIDE_VALUE: f64 = 1.0;

/// What to do with a window that yields no run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmptyWindowPolicy {
    /// Write the given value and keep going
    Sentinel(f64),
    /// Abort the whole computation
    Strict,
}

impl Default for EmptyWindowPolicy {
    fn default() -> Self {
        Self::Sentinel(f64::NAN)
    }
}

/// Configuration of a windowed run-length feature map
#[derive(Debug, Clone)]
pub struct RunLengthMapParams<const D: usize> {
    radius: [usize; D],
    offsets: Vec<[i64; D]>,
    feature: RunLengthFeature,
    bins_per_axis: usize,
    pixel_value_range: Option<(f64, f64)>,
    distance_range: Option<(f64, f64)>,
    inside_value: f64,
    empty_window_policy: EmptyWindowPolicy,
    modified: u64,
}

impl<const D: usize> Default for RunLengthMapParams<D> {
    fn default() -> Self {
        Self {
            radius: [DEFAULT_RADIUS; D],
            offsets: default_offsets(),
            feature: RunLengthFeature::default(),
            bins_per_axis: DEFAULT_BINS_PER_AXIS,
            pixel_value_range: None,
            distance_range: None,
            inside_value: DEFAULT_INSIDE_VALUE,
            empty_window_policy: EmptyWindowPolicy::default(),
            modified: 0,
        }
    }
}

impl<const D: usize> RunLengthMapParams<D> {
    /// Parameters with every default
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self) {
        self.modified += 1;
    }

    /// Modification counter, bumped by every accepted change
    #[inline]
    pub fn modified_count(&self) -> u64 {
        self.modified
    }

    /// Window half-width per axis
    #[inline]
    pub fn radius(&self) -> [usize; D] {
        self.radius
    }

    /// Set the window half-width per axis
    pub fn set_radius(&mut self, radius: [usize; D]) {
        if self.radius != radius {
            debug!("RunLengthMapParams: setting radius to {:?}", radius);
            self.radius = radius;
            self.touch();
        }
    }

    /// Run directions
    #[inline]
    pub fn offsets(&self) -> &[[i64; D]] {
        &self.offsets
    }

    /// Set the run directions
    ///
    /// # Errors
    ///
    /// `TextureError::EmptyOffsets` for an empty set,
    /// `TextureError::ZeroOffset` if any offset is the zero vector.
    pub fn set_offsets(&mut self, offsets: Vec<[i64; D]>) -> TextureResult<()> {
        validate_offsets(&offsets)?;
        if self.offsets != offsets {
            debug!("RunLengthMapParams: setting {} offsets", offsets.len());
            self.offsets = offsets;
            self.touch();
        }
        Ok(())
    }

    /// The feature written to the output
    #[inline]
    pub fn feature(&self) -> RunLengthFeature {
        self.feature
    }

    /// Select the feature written to the output
    pub fn set_feature(&mut self, feature: RunLengthFeature) {
        if self.feature != feature {
            debug!("RunLengthMapParams: setting feature to {}", feature);
            self.feature = feature;
            self.touch();
        }
    }

    /// Select the feature by name
    ///
    /// # Errors
    ///
    /// `TextureError::UnknownFeature` for a name outside the catalogue.
    pub fn set_feature_by_name(&mut self, name: &str) -> TextureResult<()> {
        let feature = name.parse()?;
        self.set_feature(feature);
        Ok(())
    }

    /// Bins on each matrix axis
    #[inline]
    pub fn bins_per_axis(&self) -> usize {
        self.bins_per_axis
    }

    /// Set the bins on each matrix axis (at least 1)
    pub fn set_bins_per_axis(&mut self, bins: usize) -> TextureResult<()> {
        if bins == 0 {
            return Err(TextureError::InvalidParameters(
                "bins per axis must be >= 1".into(),
            ));
        }
        if self.bins_per_axis != bins {
            debug!("RunLengthMapParams: setting bins per axis to {}", bins);
            self.bins_per_axis = bins;
            self.touch();
        }
        Ok(())
    }

    /// Explicit grey-level range, `None` when derived from the input
    #[inline]
    pub fn pixel_value_range(&self) -> Option<(f64, f64)> {
        self.pixel_value_range
    }

    /// Set the grey-level range
    pub fn set_pixel_value_min_max(&mut self, min: f64, max: f64) -> TextureResult<()> {
        check_range("pixel value", (min, max))?;
        if self.pixel_value_range != Some((min, max)) {
            debug!("RunLengthMapParams: setting pixel value range to [{}, {}]", min, max);
            self.pixel_value_range = Some((min, max));
            self.touch();
        }
        Ok(())
    }

    /// Derive the grey-level range from the input's minimum and maximum
    pub fn clear_pixel_value_range(&mut self) {
        if self.pixel_value_range.take().is_some() {
            debug!("RunLengthMapParams: pixel value range derived from input");
            self.touch();
        }
    }

    /// Explicit run-length distance range, `None` for `[0, window diagonal]`
    #[inline]
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        self.distance_range
    }

    /// Set the run-length distance range
    pub fn set_distance_value_min_max(&mut self, min: f64, max: f64) -> TextureResult<()> {
        check_range("distance", (min, max))?;
        if min < 0.0 {
            return Err(TextureError::InvalidParameters(format!(
                "distance minimum must be >= 0, got {min}"
            )));
        }
        if self.distance_range != Some((min, max)) {
            debug!("RunLengthMapParams: setting distance range to [{}, {}]", min, max);
            self.distance_range = Some((min, max));
            self.touch();
        }
        Ok(())
    }

    /// Use `[0, window diagonal]` as the distance range
    pub fn clear_distance_range(&mut self) {
        if self.distance_range.take().is_some() {
            debug!("RunLengthMapParams: distance range derived from window");
            self.touch();
        }
    }

    /// Mask value marking valid pixels
    #[inline]
    pub fn inside_value(&self) -> f64 {
        self.inside_value
    }

    /// Set the mask value marking valid pixels
    pub fn set_inside_value(&mut self, value: f64) -> TextureResult<()> {
        if !value.is_finite() {
            return Err(TextureError::InvalidParameters(format!(
                "inside value must be finite, got {value}"
            )));
        }
        if self.inside_value != value {
            debug!("RunLengthMapParams: setting inside value to {}", value);
            self.inside_value = value;
            self.touch();
        }
        Ok(())
    }

    /// Handling of windows without runs
    #[inline]
    pub fn empty_window_policy(&self) -> EmptyWindowPolicy {
        self.empty_window_policy
    }

    /// Set the handling of windows without runs
    pub fn set_empty_window_policy(&mut self, policy: EmptyWindowPolicy) {
        let same = match (self.empty_window_policy, policy) {
            (EmptyWindowPolicy::Strict, EmptyWindowPolicy::Strict) => true,
            (EmptyWindowPolicy::Sentinel(a), EmptyWindowPolicy::Sentinel(b)) => {
                a.to_bits() == b.to_bits()
            }
            _ => false,
        };
        if !same {
            debug!("RunLengthMapParams: setting empty window policy to {:?}", policy);
            self.empty_window_policy = policy;
            self.touch();
        }
    }

    /// Binning for one computation.
    ///
    /// Unset ranges fall back to `input_range` (grey levels, `[0, 0]` if
    /// the input holds no value) and `[0, window diagonal]` (distances).
    pub fn resolve_binning(
        &self,
        input_range: Option<(f64, f64)>,
        geometry: &NeighborhoodGeometry<D>,
    ) -> TextureResult<RunLengthBinning> {
        let pixel_range = self
            .pixel_value_range
            .or(input_range)
            .unwrap_or((0.0, 0.0));
        let distance_range = self
            .distance_range
            .unwrap_or((0.0, geometry.window_diagonal(&geometry.output.spacing)));
        RunLengthBinning::new(self.bins_per_axis, pixel_range, distance_range)
    }
}
