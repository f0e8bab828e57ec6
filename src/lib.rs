//! # stream_metrics
//!
//! Deterministic **windowed moving mean** for `f64` streams.
//!
//! The centerpiece is [`metrics::moving_mean::MovingMean`], an O(1)-per-sample
//! accumulator over the most recent `W` samples with explicit **NaN
//! poisoning** semantics: a NaN sample is treated as valid domain data that
//! contaminates the mean until it is evicted from the window, at which point a
//! one-shot rescan restores a finite mean (or re-poisons if another NaN is
//! still stored).
//!
//! ## Design principles
//! - **Determinism**: strictly sequential updates; the same sample order
//!   always yields the same bits. No internal parallelism.
//! - **Explicit NaN semantics**: bad *data* (NaN samples) propagates through
//!   the returned mean; bad *calls* (an invalid window size) fail at
//!   construction with [`metrics::validate::InvalidWindow`]. The two never mix.
//! - **Bounded work**: every update is O(1) except the single recovery rescan
//!   after a poisoning cycles out, which is O(W) and cannot recur without a
//!   fresh NaN.
//!
//! ## Example
//! ```
//! use stream_metrics::moving_mean::MovingMean;
//!
//! let mut mm = MovingMean::new(3).unwrap();
//! assert_eq!(mm.mean(), None);
//! mm.update(1.0);
//! mm.update(2.0);
//! mm.update(3.0);
//! assert_eq!(mm.update(4.0), 3.0); // window is now [2, 3, 4]
//! ```

pub mod metrics;
pub mod moving_mean;
