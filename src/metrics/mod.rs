//! Metric building blocks.
//!
//! - [`moving_mean`]: the windowed moving-mean accumulator.
//! - [`window`]: fixed-capacity circular sample storage.
//! - [`validate`]: construction-time argument validation.

pub mod moving_mean;
pub mod validate;
pub mod window;
