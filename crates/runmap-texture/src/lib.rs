//! runmap-texture - Grey-level run-length texture features
//!
//! This crate provides run-length texture analysis for N-dimensional
//! images:
//!
//! - Run-length matrix accumulation along arbitrary offsets, honouring a mask
//! - The ten classic run-length features (short/long run emphasis,
//!   non-uniformities, grey-level emphases)
//! - Windowed feature maps: one feature per pixel, computed over the
//!   neighbourhood around it
//! - Whole-region summaries (mean and deviation across offsets)
//!
//! Enable the `parallel` feature to evaluate feature maps on rayon.

mod error;
pub mod feature;
pub mod filter;
pub mod geometry;
pub mod matrix;
pub mod offsets;
mod parallel;
pub mod params;
pub mod summary;
pub mod windowed;

pub use error::{TextureError, TextureResult};
pub use parallel::MaybeSync;

// Re-export commonly used items
pub use feature::{RunLengthFeature, RunLengthFeatureValues, extract_feature};
pub use filter::{
    FeatureMap, RunLengthFeatureMapFilter, run_length_feature_map, run_length_feature_map_masked,
};
pub use geometry::NeighborhoodGeometry;
pub use matrix::{RunLengthBinning, RunLengthMatrix, accumulate};
pub use offsets::{default_offsets, half_neighborhood_offsets, validate_offsets};
pub use params::{EmptyWindowPolicy, RunLengthMapParams};
pub use summary::{
    FeatureStatistics, RegionFeatureSummary, SummaryOptions, region_feature_summary,
    region_feature_summary_masked,
};
pub use windowed::{FeatureMapStats, compute_feature_map, window_matrix};
