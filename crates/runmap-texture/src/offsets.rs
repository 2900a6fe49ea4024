//! Default run directions
//!
//! Runs are direction symmetric, so only the neighbourhood positions that
//! precede the centre (axis 0 fastest) are kept; the other half is
//! covered by symmetry.

use crate::{TextureError, TextureResult};

/// Offsets to the neighbourhood positions preceding the centre.
///
/// For radius 1 this is half of the `3^D - 1` face, edge and vertex
/// neighbours. In 2-D the order is `[-1,-1], [0,-1], [1,-1], [-1,0]`.
///
/// Returns an empty set if the neighbourhood size `(2r + 1)^D` does not
/// fit in `usize`.
pub fn half_neighborhood_offsets<const D: usize>(radius: usize) -> Vec<[i64; D]> {
    if D == 0 {
        return Vec::new();
    }
    let Some((side, count)) = radius
        .checked_mul(2)
        .and_then(|s| s.checked_add(1))
        .and_then(|side| side.checked_pow(D as u32).map(|count| (side, count)))
    else {
        return Vec::new();
    };
    let Ok(r) = i64::try_from(radius) else {
        return Vec::new();
    };
    let center = count / 2;

    (0..center)
        .map(|position| {
            let mut offset = [0i64; D];
            let mut rest = position;
            for o in offset.iter_mut() {
                *o = (rest % side) as i64 - r;
                rest /= side;
            }
            offset
        })
        .collect()
}

/// Default offset set: the unit-radius half neighbourhood
pub fn default_offsets<const D: usize>() -> Vec<[i64; D]> {
    half_neighborhood_offsets(1)
}

/// Check an offset set: non-empty and free of zero vectors
pub fn validate_offsets<const D: usize>(offsets: &[[i64; D]]) -> TextureResult<()> {
    if offsets.is_empty() {
        return Err(TextureError::EmptyOffsets);
    }
    if let Some(zero) = offsets.iter().find(|o| o.iter().all(|&c| c == 0)) {
        return Err(TextureError::ZeroOffset(zero.to_vec()));
    }
    Ok(())
}
