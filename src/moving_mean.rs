//! Public-facing moving-mean API (crate root re-exports).
//!
//! Downstream crates are expected to reach for
//! `use stream_metrics::moving_mean::{...};` rather than the full
//! `metrics::moving_mean` path.
//!
//! # Examples
//! ```
//! use stream_metrics::moving_mean::{MovingMean, Phase};
//!
//! let mut mm = MovingMean::new(2).unwrap();
//! assert_eq!(mm.phase(), Phase::Empty);
//! mm.update(1.0);
//! mm.update(f64::NAN);
//! assert!(mm.is_poisoned());
//! ```

pub use crate::metrics::moving_mean::{MeanSnapshot, MovingMean, Phase};
pub use crate::metrics::validate::{window_size, InvalidWindow};
