//! runmap Core - Basic data structures for N-dimensional image analysis
//!
//! This crate provides the fundamental data structures used throughout
//! runmap:
//!
//! - [`NdImage`] - Dense N-dimensional scalar image with spacing and origin
//! - [`ImageRegion`] - Rectangular index region and its lexicographic iterator
//! - [`ImageInfo`] - Grid description (region, spacing, origin)
//! - [`ImageSource`] / [`ImageSink`] / [`ImageMask`] - Capabilities the
//!   algorithms are written against

pub mod error;
pub mod image;
pub mod region;

pub use error::{Error, Result};
pub use image::source::{ImageMask, ImageSink, ImageSource, NoMask, ValueMask};
pub use image::{ImageInfo, NdImage, Scalar};
pub use region::{ImageRegion, RegionIter};
