//! Eroded output geometry
//!
//! A window of radius `r` centred on `p` stays inside the image only when
//! `p` is at least `r` away from every border. The output grid therefore
//! shrinks by `2r` on each axis and its origin moves inward so that each
//! output pixel sits at the physical position of its window centre.

use runmap_core::{ImageInfo, ImageRegion};

/// Input and output regions of a windowed computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborhoodGeometry<const D: usize> {
    /// Positions of the input whose windows fit inside the image
    pub input_region: ImageRegion<D>,
    /// Grid of the output image
    pub output: ImageInfo<D>,
    /// Window half-width per axis
    pub radius: [usize; D],
}

impl<const D: usize> NeighborhoodGeometry<D> {
    /// Compute the geometry for an input grid and a radius.
    ///
    /// If any axis is too short (`size <= 2 * radius`) the geometry is
    /// empty: both regions have size 0 on every axis. A radius whose
    /// double does not fit in `usize` counts as too large.
    pub fn compute(input: &ImageInfo<D>, radius: [usize; D]) -> Self {
        let start = input.region.index();
        let size = input.region.size();

        let shrink = radius.map(|r| r.checked_mul(2));
        let empty = (0..D).any(|d| shrink[d].is_none_or(|s| size[d] <= s));

        let mut sub_index = [0i64; D];
        let mut sub_size = [0usize; D];
        let mut origin = [0.0f64; D];
        for d in 0..D {
            sub_index[d] = start[d].saturating_add_unsigned(radius[d] as u64);
            if !empty {
                sub_size[d] = size[d] - 2 * radius[d];
            }
            origin[d] = input.origin[d] + input.spacing[d] * sub_index[d] as f64;
        }

        Self {
            input_region: ImageRegion::new(sub_index, sub_size),
            output: ImageInfo {
                region: ImageRegion::with_size(sub_size),
                spacing: input.spacing,
                origin,
            },
            radius,
        }
    }

    /// True if no output pixel exists
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.input_region.is_empty()
    }

    /// Window centred on an input position (inclusive bounds `p ± r`)
    pub fn window(&self, center: &[i64; D]) -> ImageRegion<D> {
        let mut lower = *center;
        let mut upper = *center;
        for d in 0..D {
            lower[d] = lower[d].saturating_sub_unsigned(self.radius[d] as u64);
            upper[d] = upper[d].saturating_add_unsigned(self.radius[d] as u64);
        }
        ImageRegion::from_bounds(lower, upper)
    }

    /// Output index of an input position
    pub fn output_index(&self, input: &[i64; D]) -> [i64; D] {
        let start = self.input_region.index();
        let mut out = [0i64; D];
        for d in 0..D {
            out[d] = input[d] - start[d];
        }
        out
    }

    /// Physical length of the window diagonal
    pub fn window_diagonal(&self, spacing: &[f64; D]) -> f64 {
        (0..D)
            .map(|d| {
                let extent = 2.0 * self.radius[d] as f64 * spacing[d];
                extent * extent
            })
            .sum::<f64>()
            .sqrt()
    }
}
