//! NdImage - Dense N-dimensional scalar image
//!
//! `NdImage<T, D>` stores one pixel of type `T` per index of its largest
//! region, together with the physical spacing and origin of the grid.
//!
//! See [`source`] for the read/write capabilities the texture algorithms
//! are written against.
//!
//! # Examples
//!
//! ```
//! use runmap_core::NdImage;
//!
//! // 4 x 3 image, all pixels 0
//! let mut img = NdImage::<u8, 2>::new([4, 3]).unwrap();
//! img.set(&[2, 1], 7).unwrap();
//! assert_eq!(img.get(&[2, 1]), Some(7));
//! assert_eq!(img.get(&[4, 0]), None);
//! ```

pub mod source;

use crate::error::{Error, Result};
use crate::region::ImageRegion;

/// Scalar pixel types readable as `f64`
pub trait Scalar: Copy + PartialEq + Default + Send + Sync + 'static {
    /// Widen the pixel value to `f64`
    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, i8, i16, i32, f32, f64);

/// Grid description of an image: region plus physical metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo<const D: usize> {
    /// Largest possible region
    pub region: ImageRegion<D>,
    /// Physical distance between neighbouring pixels on each axis
    pub spacing: [f64; D],
    /// Physical position of index 0
    pub origin: [f64; D],
}

impl<const D: usize> ImageInfo<D> {
    /// Grid of the given size with unit spacing and zero origin
    pub fn with_size(size: [usize; D]) -> Self {
        Self {
            region: ImageRegion::with_size(size),
            spacing: [1.0; D],
            origin: [0.0; D],
        }
    }

    /// Physical position of an index
    pub fn index_to_physical(&self, index: &[i64; D]) -> [f64; D] {
        let mut p = [0.0; D];
        for d in 0..D {
            p[d] = self.origin[d] + self.spacing[d] * index[d] as f64;
        }
        p
    }

    /// Euclidean physical distance between two indices
    pub fn physical_distance(&self, a: &[i64; D], b: &[i64; D]) -> f64 {
        let mut sum = 0.0;
        for d in 0..D {
            let delta = (a[d] - b[d]) as f64 * self.spacing[d];
            sum += delta * delta;
        }
        sum.sqrt()
    }
}

fn check_spacing<const D: usize>(spacing: &[f64; D]) -> Result<()> {
    if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(Error::InvalidMetadata(format!(
            "spacing must be finite and positive: {:?}",
            spacing
        )));
    }
    Ok(())
}

fn check_origin<const D: usize>(origin: &[f64; D]) -> Result<()> {
    if origin.iter().any(|o| !o.is_finite()) {
        return Err(Error::InvalidMetadata(format!(
            "origin must be finite: {:?}",
            origin
        )));
    }
    Ok(())
}

/// Dense N-dimensional image
///
/// # Memory Layout
///
/// Pixels are stored with axis 0 varying fastest and no padding. The
/// pixel at `index` lives at `sum((index[d] - start[d]) * stride[d])` with
/// `stride[0] = 1` and `stride[d] = stride[d-1] * size[d-1]`.
///
/// Zero-sized images are valid; they hold no pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct NdImage<T, const D: usize> {
    info: ImageInfo<D>,
    data: Vec<T>,
}

impl<T: Scalar, const D: usize> NdImage<T, D> {
    /// Create an image with every pixel set to `T::default()`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero-dimensional image.
    pub fn new(size: [usize; D]) -> Result<Self> {
        Self::new_with_value(size, T::default())
    }

    /// Create an image with every pixel set to `value`
    pub fn new_with_value(size: [usize; D], value: T) -> Result<Self> {
        if D == 0 {
            return Err(Error::InvalidParameter(
                "image dimension must be at least 1".into(),
            ));
        }
        let info = ImageInfo::with_size(size);
        let data = vec![value; info.region.num_pixels()];
        Ok(Self { info, data })
    }

    /// Create an image from raw pixel data in memory order
    ///
    /// # Errors
    ///
    /// Returns `Error::DataLength` if `data.len()` is not the product of
    /// the sizes.
    pub fn from_data(size: [usize; D], data: Vec<T>) -> Result<Self> {
        if D == 0 {
            return Err(Error::InvalidParameter(
                "image dimension must be at least 1".into(),
            ));
        }
        let info = ImageInfo::with_size(size);
        let expected = info.region.num_pixels();
        if data.len() != expected {
            return Err(Error::DataLength {
                size: size.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { info, data })
    }

    /// Create an image by evaluating `f` at every index
    pub fn from_fn<F>(size: [usize; D], mut f: F) -> Result<Self>
    where
        F: FnMut([i64; D]) -> T,
    {
        let region = ImageRegion::with_size(size);
        let data = region.iter().map(&mut f).collect();
        Self::from_data(size, data)
    }

    /// Create an image from a grid description, every pixel `value`
    pub fn from_info(info: ImageInfo<D>, value: T) -> Result<Self> {
        check_spacing(&info.spacing)?;
        check_origin(&info.origin)?;
        let mut img = Self::new_with_value(info.region.size(), value)?;
        img.info = info;
        Ok(img)
    }

    /// Set the physical spacing
    pub fn with_spacing(mut self, spacing: [f64; D]) -> Result<Self> {
        self.set_spacing(spacing)?;
        Ok(self)
    }

    /// Set the physical origin
    pub fn with_origin(mut self, origin: [f64; D]) -> Result<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    /// Move the start index of the largest region
    pub fn with_start_index(mut self, index: [i64; D]) -> Self {
        self.info.region = ImageRegion::new(index, self.info.region.size());
        self
    }

    /// Set the physical spacing (must be finite and positive)
    pub fn set_spacing(&mut self, spacing: [f64; D]) -> Result<()> {
        check_spacing(&spacing)?;
        self.info.spacing = spacing;
        Ok(())
    }

    /// Set the physical origin (must be finite)
    pub fn set_origin(&mut self, origin: [f64; D]) -> Result<()> {
        check_origin(&origin)?;
        self.info.origin = origin;
        Ok(())
    }

    /// Grid description
    #[inline]
    pub fn info(&self) -> &ImageInfo<D> {
        &self.info
    }

    /// Largest possible region
    #[inline]
    pub fn largest_region(&self) -> ImageRegion<D> {
        self.info.region
    }

    /// Size per axis
    #[inline]
    pub fn size(&self) -> [usize; D] {
        self.info.region.size()
    }

    /// Physical spacing
    #[inline]
    pub fn spacing(&self) -> [f64; D] {
        self.info.spacing
    }

    /// Physical origin
    #[inline]
    pub fn origin(&self) -> [f64; D] {
        self.info.origin
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-sized image
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel data in memory order
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable pixel data in memory order
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a pixel, `None` outside the largest region
    #[inline]
    pub fn get(&self, index: &[i64; D]) -> Option<T> {
        self.info
            .region
            .linear_offset(index)
            .map(|offset| self.data[offset])
    }

    /// Set a pixel
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` outside the largest region.
    pub fn set(&mut self, index: &[i64; D], value: T) -> Result<()> {
        let offset = self.info.region.checked_offset(index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// True if `other` has the same region, spacing and origin
    pub fn same_grid<U: Scalar>(&self, other: &NdImage<U, D>) -> bool {
        self.info == other.info
    }

    /// Minimum and maximum pixel value as `f64`, ignoring NaN.
    ///
    /// Returns `None` if the image holds no comparable value.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut result: Option<(f64, f64)> = None;
        for v in self.data.iter().map(|p| p.to_f64()) {
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

    /// Apply `f` to every pixel, keeping the grid
    pub fn map<U: Scalar, F: FnMut(T) -> U>(&self, f: F) -> NdImage<U, D> {
        NdImage {
            info: self.info,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Physical position of an index
    pub fn index_to_physical(&self, index: &[i64; D]) -> [f64; D] {
        self.info.index_to_physical(index)
    }
}
