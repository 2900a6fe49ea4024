//! runmap - Run-length texture feature maps for N-dimensional images
//!
//! Computes, for every pixel of a 2-D, 3-D or higher dimensional image, a
//! grey-level run-length texture feature over the neighbourhood around
//! it. The result is an image on the eroded grid of the input whose
//! physical placement matches the window centres.
//!
//! # Example
//!
//! ```
//! use runmap::texture::{RunLengthFeature, RunLengthMapParams, run_length_feature_map};
//! use runmap::NdImage;
//!
//! let image = NdImage::<u16, 3>::from_fn([8, 8, 8], |[x, y, z]| ((x + y + z) % 5) as u16)
//!     .unwrap();
//!
//! let mut params = RunLengthMapParams::new();
//! params.set_radius([1, 1, 1]);
//! params.set_feature(RunLengthFeature::ShortRunEmphasis);
//!
//! let map = run_length_feature_map(&image, &params).unwrap();
//! assert_eq!(map.image.size(), [6, 6, 6]);
//! assert_eq!(map.stats.empty_windows, 0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use runmap_core::*;

// Re-export the texture crate as a module
pub use runmap_texture as texture;
