//! Module: `metrics::validate`
//!
//! Construction-time validation for window sizes.
//!
//! The accumulator in [`crate::metrics::moving_mean`] draws a hard line
//! between bad *calls* and bad *data*: a NaN **sample** is legitimate input
//! that poisons the running mean, while an invalid **window size** is a
//! caller bug and fails construction with [`InvalidWindow`]. This module owns
//! the latter check.
//!
//! The predicate accepts a raw `f64` so that callers sitting at an untyped
//! boundary (config files, FFI, scripting bridges) can validate once and move
//! to `usize` for the rest of the crate. Anything that is not a finite,
//! strictly positive integer is rejected; nothing is silently coerced.
//!
//! # Examples
//! ```
//! use stream_metrics::metrics::validate::window_size;
//!
//! assert_eq!(window_size(5.0), Ok(5));
//! assert!(window_size(0.0).is_err());
//! assert!(window_size(2.5).is_err());
//! assert!(window_size(f64::NAN).is_err());
//! ```

use thiserror::Error;

/// Rejected window size. Raised at construction only; never produced by
/// `update`/`mean`, which express bad data through NaN instead.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidWindow {
    /// The candidate was NaN, infinite, negative, zero, or fractional.
    #[error("invalid argument. Must provide a positive integer. Value: `{0}`.")]
    NotAPositiveInteger(f64),
    /// The candidate was a valid integer but does not fit in `usize`.
    #[error("invalid argument. Window size `{0}` exceeds the addressable range.")]
    OutOfRange(f64),
}

/// Validates a candidate window size.
///
/// Returns the size as `usize` iff the input is a finite, strictly positive
/// integer that fits the platform's address space.
pub fn window_size(candidate: f64) -> Result<usize, InvalidWindow> {
    if !candidate.is_finite() || candidate < 1.0 || candidate.fract() != 0.0 {
        return Err(InvalidWindow::NotAPositiveInteger(candidate));
    }
    // 2^53 is the largest f64 with integer neighbors; beyond usize::MAX the
    // `as` cast would saturate, so reject explicitly.
    if candidate > usize::MAX as f64 {
        return Err(InvalidWindow::OutOfRange(candidate));
    }
    Ok(candidate as usize)
}
