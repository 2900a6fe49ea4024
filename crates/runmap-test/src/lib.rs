//! runmap-test - Regression test framework for runmap
//!
//! This crate provides a small regression test harness and synthetic
//! image generators. Two modes are supported:
//!
//! - **Compare**: Compare results with expected values (default)
//! - **Display**: Run tests and print values without failing
//!
//! # Usage
//!
//! ```ignore
//! use runmap_test::RegParams;
//!
//! let mut rp = RegParams::new("windowed");
//! rp.compare_values(9.0, value, 1e-12);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
