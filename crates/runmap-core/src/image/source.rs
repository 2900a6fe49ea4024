//! Image capabilities
//!
//! Algorithms read pixels through [`ImageSource`], write results through
//! [`ImageSink`] and ask [`ImageMask`] which pixels may contribute. Any
//! container can take part by implementing the traits; [`NdImage`] does
//! so out of the box.

use super::{ImageInfo, NdImage, Scalar};
use crate::error::Result;

/// Read access to a scalar image
pub trait ImageSource<const D: usize> {
    /// Grid of the image
    fn info(&self) -> ImageInfo<D>;

    /// Pixel value at `index`, `None` outside the largest region
    fn value_at(&self, index: &[i64; D]) -> Option<f64>;

    /// Minimum and maximum pixel value, ignoring NaN
    fn value_range(&self) -> Option<(f64, f64)> {
        let mut result: Option<(f64, f64)> = None;
        for index in self.info().region.iter() {
            let Some(v) = self.value_at(&index) else {
                continue;
            };
            if v.is_nan() {
                continue;
            }
            result = Some(match result {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        result
    }
}

/// Write access to a scalar image
pub trait ImageSink<const D: usize> {
    /// Prepare storage for the given grid, discarding previous content
    fn allocate(&mut self, info: &ImageInfo<D>) -> Result<()>;

    /// Store one value
    fn write(&mut self, index: &[i64; D], value: f64) -> Result<()>;

    /// Store consecutive values along axis 0 starting at `start`
    fn write_line(&mut self, start: &[i64; D], values: &[f64]) -> Result<()> {
        let mut index = *start;
        for &v in values {
            self.write(&index, v)?;
            index[0] += 1;
        }
        Ok(())
    }
}

/// Pixel eligibility for run sampling
pub trait ImageMask<const D: usize> {
    /// True if the pixel at `index` may contribute
    fn is_inside(&self, index: &[i64; D]) -> bool;

    /// Grid the mask is defined on, `None` if it accepts any grid
    fn grid(&self) -> Option<ImageInfo<D>> {
        None
    }
}

/// Mask accepting every pixel
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMask;

impl<const D: usize> ImageMask<D> for NoMask {
    #[inline]
    fn is_inside(&self, _index: &[i64; D]) -> bool {
        true
    }
}

/// Mask selecting pixels of an image that equal an inside value
#[derive(Debug, Clone, Copy)]
pub struct ValueMask<'a, S: ?Sized> {
    source: &'a S,
    inside: f64,
}

impl<'a, S: ?Sized> ValueMask<'a, S> {
    /// Pixels of `source` equal to `inside` are inside the mask
    pub fn new(source: &'a S, inside: f64) -> Self {
        Self { source, inside }
    }

    /// The inside value
    pub fn inside_value(&self) -> f64 {
        self.inside
    }
}

impl<S: ImageSource<D> + ?Sized, const D: usize> ImageMask<D> for ValueMask<'_, S> {
    #[inline]
    fn is_inside(&self, index: &[i64; D]) -> bool {
        self.source.value_at(index) == Some(self.inside)
    }

    fn grid(&self) -> Option<ImageInfo<D>> {
        Some(self.source.info())
    }
}

impl<T: Scalar, const D: usize> ImageSource<D> for NdImage<T, D> {
    #[inline]
    fn info(&self) -> ImageInfo<D> {
        *NdImage::info(self)
    }

    #[inline]
    fn value_at(&self, index: &[i64; D]) -> Option<f64> {
        self.get(index).map(Scalar::to_f64)
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        self.min_max()
    }
}

impl<const D: usize> ImageSink<D> for NdImage<f64, D> {
    fn allocate(&mut self, info: &ImageInfo<D>) -> Result<()> {
        *self = NdImage::from_info(*info, 0.0)?;
        Ok(())
    }

    #[inline]
    fn write(&mut self, index: &[i64; D], value: f64) -> Result<()> {
        self.set(index, value)
    }

    fn write_line(&mut self, start: &[i64; D], values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let first = self.largest_region().checked_offset(start)?;
        let mut last_index = *start;
        last_index[0] += values.len() as i64 - 1;
        let last = self.largest_region().checked_offset(&last_index)?;
        // Axis 0 is contiguous in memory
        debug_assert_eq!(last - first + 1, values.len());
        self.data_mut()[first..=last].copy_from_slice(values);
        Ok(())
    }
}
