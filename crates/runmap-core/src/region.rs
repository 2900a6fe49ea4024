//! ImageRegion - N-dimensional rectangular index regions
//!
//! A region is a start index plus a size per axis. Regions are small
//! `Copy` values, so they are passed around freely instead of shared.
//!
//! Iteration order is lexicographic with axis 0 varying fastest, which is
//! also the memory order of [`NdImage`](crate::NdImage).

use crate::error::{Error, Result};

/// An axis-aligned block of pixel indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRegion<const D: usize> {
    /// First index on each axis
    index: [i64; D],
    /// Number of indices on each axis
    size: [usize; D],
}

impl<const D: usize> Default for ImageRegion<D> {
    fn default() -> Self {
        Self {
            index: [0; D],
            size: [0; D],
        }
    }
}

impl<const D: usize> ImageRegion<D> {
    /// Create a region from a start index and a size
    pub const fn new(index: [i64; D], size: [usize; D]) -> Self {
        Self { index, size }
    }

    /// Create a region starting at zero
    pub const fn with_size(size: [usize; D]) -> Self {
        Self {
            index: [0; D],
            size,
        }
    }

    /// Create a region from inclusive lower and upper corners.
    ///
    /// An axis whose upper bound lies below its lower bound gets size 0.
    pub fn from_bounds(lower: [i64; D], upper: [i64; D]) -> Self {
        let mut size = [0usize; D];
        for d in 0..D {
            if upper[d] >= lower[d] {
                size[d] = (upper[d] - lower[d] + 1) as usize;
            }
        }
        Self {
            index: lower,
            size,
        }
    }

    /// Start index
    #[inline]
    pub fn index(&self) -> [i64; D] {
        self.index
    }

    /// Size per axis
    #[inline]
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Inclusive last index on each axis.
    ///
    /// For an axis of size 0 this is `index - 1`.
    pub fn upper_index(&self) -> [i64; D] {
        let mut upper = self.index;
        for (u, &s) in upper.iter_mut().zip(self.size.iter()) {
            *u += s as i64 - 1;
        }
        upper
    }

    /// True if the region holds no pixel
    #[inline]
    pub fn is_empty(&self) -> bool {
        D == 0 || self.size.iter().any(|&s| s == 0)
    }

    /// Number of pixels in the region
    pub fn num_pixels(&self) -> usize {
        if D == 0 {
            return 0;
        }
        self.size.iter().product()
    }

    /// Check whether an index lies inside the region
    #[inline]
    pub fn contains(&self, index: &[i64; D]) -> bool {
        for d in 0..D {
            let rel = index[d] - self.index[d];
            if rel < 0 || rel >= self.size[d] as i64 {
                return false;
            }
        }
        D > 0
    }

    /// Check whether `other` lies entirely inside this region.
    ///
    /// An empty `other` is contained in every region.
    pub fn contains_region(&self, other: &ImageRegion<D>) -> bool {
        if other.is_empty() {
            return true;
        }
        self.contains(&other.index) && self.contains(&other.upper_index())
    }

    /// Linear position of `index` inside the region, axis 0 fastest.
    ///
    /// Returns `None` when the index lies outside.
    #[inline]
    pub fn linear_offset(&self, index: &[i64; D]) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let mut offset = 0usize;
        let mut stride = 1usize;
        for d in 0..D {
            offset += (index[d] - self.index[d]) as usize * stride;
            stride *= self.size[d];
        }
        Some(offset)
    }

    /// Like [`linear_offset`](Self::linear_offset) but returns an error
    /// naming the offending index.
    pub fn checked_offset(&self, index: &[i64; D]) -> Result<usize> {
        self.linear_offset(index)
            .ok_or_else(|| Error::IndexOutOfBounds {
                index: index.to_vec(),
                start: self.index.to_vec(),
                size: self.size.to_vec(),
            })
    }

    /// Same region with axis `axis` collapsed to its first index.
    ///
    /// Iterating the result visits the start of every line along `axis`.
    pub fn line_starts(&self, axis: usize) -> ImageRegion<D> {
        let mut size = self.size;
        if axis < D && size[axis] > 0 {
            size[axis] = 1;
        }
        ImageRegion {
            index: self.index,
            size,
        }
    }

    /// Iterate over all indices, axis 0 fastest
    pub fn iter(&self) -> RegionIter<D> {
        RegionIter {
            region: *self,
            current: self.index,
            remaining: self.num_pixels(),
        }
    }
}

impl<const D: usize> IntoIterator for ImageRegion<D> {
    type Item = [i64; D];
    type IntoIter = RegionIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const D: usize> IntoIterator for &ImageRegion<D> {
    type Item = [i64; D];
    type IntoIter = RegionIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lexicographic iterator over the indices of an [`ImageRegion`]
#[derive(Debug, Clone)]
pub struct RegionIter<const D: usize> {
    region: ImageRegion<D>,
    current: [i64; D],
    remaining: usize,
}

impl<const D: usize> Iterator for RegionIter<D> {
    type Item = [i64; D];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.current;
        self.remaining -= 1;

        for d in 0..D {
            self.current[d] += 1;
            if self.current[d] < self.region.index[d] + self.region.size[d] as i64 {
                break;
            }
            self.current[d] = self.region.index[d];
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const D: usize> ExactSizeIterator for RegionIter<D> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bounds() {
        let r = ImageRegion::from_bounds([1, 2], [3, 2]);
        assert_eq!(r.index(), [1, 2]);
        assert_eq!(r.size(), [3, 1]);
        assert_eq!(r.upper_index(), [3, 2]);

        let empty = ImageRegion::from_bounds([4, 0], [3, 5]);
        assert!(empty.is_empty());
        assert_eq!(empty.num_pixels(), 0);
    }

    #[test]
    fn test_iteration_order_axis0_fastest() {
        let r = ImageRegion::new([1, 10], [2, 2]);
        let indices: Vec<[i64; 2]> = r.iter().collect();
        assert_eq!(indices, vec![[1, 10], [2, 10], [1, 11], [2, 11]]);
        assert_eq!(r.iter().len(), 4);
    }

    #[test]
    fn test_empty_region_iterates_nothing() {
        let r = ImageRegion::new([0, 0, 0], [3, 0, 2]);
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn test_contains_and_offset() {
        let r = ImageRegion::new([-1, 2], [3, 4]);
        assert!(r.contains(&[-1, 2]));
        assert!(r.contains(&[1, 5]));
        assert!(!r.contains(&[2, 5]));
        assert!(!r.contains(&[0, 1]));

        assert_eq!(r.linear_offset(&[-1, 2]), Some(0));
        assert_eq!(r.linear_offset(&[0, 2]), Some(1));
        assert_eq!(r.linear_offset(&[-1, 3]), Some(3));
        assert_eq!(r.linear_offset(&[1, 5]), Some(11));
        assert_eq!(r.linear_offset(&[5, 5]), None);
        assert!(r.checked_offset(&[5, 5]).is_err());
    }

    #[test]
    fn test_contains_region() {
        let outer = ImageRegion::with_size([5, 5]);
        assert!(outer.contains_region(&ImageRegion::new([1, 1], [3, 3])));
        assert!(!outer.contains_region(&ImageRegion::new([3, 3], [3, 3])));
        assert!(outer.contains_region(&ImageRegion::new([9, 9], [0, 3])));
    }

    #[test]
    fn test_line_starts() {
        let r = ImageRegion::new([2, 0, 0], [4, 3, 2]);
        let starts: Vec<[i64; 3]> = r.line_starts(0).iter().collect();
        assert_eq!(starts.len(), 6);
        assert!(starts.iter().all(|s| s[0] == 2));
    }
}
