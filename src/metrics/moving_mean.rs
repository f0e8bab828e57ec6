//! Module: `metrics::moving_mean`
//!
//! Deterministic **moving mean over a fixed window** of `f64` samples, with
//! explicit NaN poisoning and recovery semantics.
//!
//! # Goals
//! - **O(1) amortized updates:** no rescans of the stored window on the hot
//!   path; the only O(W) branch is the one-shot recovery after a poisoning
//!   cycles out.
//! - **Determinism:** strictly sequential, single-thread accumulation; the
//!   same sample order always produces the same result.
//! - **Explicit NaN semantics:** a NaN *sample* is valid domain data that
//!   poisons the mean for exactly one full window turn, mirroring IEEE-754
//!   propagation. A bad *window size* is a caller error and fails
//!   construction — see [`crate::metrics::validate`].
//!
//! # Behavior summary
//! The accumulator moves through four phases (see [`Phase`]):
//!
//! - **Filling** (`count < capacity`): the mean is maintained with the
//!   incremental (Welford-style) rule `mean += (x - mean) / count`, so every
//!   prefix reports the exact running average without resummation.
//! - **Steady** (window full, no NaN stored): each update evicts the oldest
//!   sample in strict FIFO order and applies the O(1) sliding rule
//!   `mean += (x - evicted) / capacity`.
//! - **Poisoned**: admitting a NaN immediately forces `count = capacity` and
//!   `mean = NaN`, as if the window had instantly filled with contamination.
//!   The mean stays NaN until the slot that received the NaN is itself
//!   evicted, i.e. for exactly `capacity` subsequent updates (another NaN
//!   restarts the cycle).
//! - **Recovery** (transient, inside a single update): when the write cursor
//!   returns to the poisoned slot, the mean is rebuilt by folding the stored
//!   samples together with the incoming one. If any *other* stored slot is
//!   also NaN the rebuild aborts and the accumulator re-poisons.
//!
//! # Examples
//! Window of three, then one eviction:
//! ```
//! use stream_metrics::metrics::moving_mean::MovingMean;
//!
//! let mut mm = MovingMean::new(3).unwrap();
//! assert_eq!(mm.update(1.0), 1.0);
//! assert_eq!(mm.update(2.0), 1.5);
//! assert_eq!(mm.update(3.0), 2.0);
//! assert_eq!(mm.update(4.0), 3.0); // window is now [2, 3, 4]
//! ```
//!
//! Poisoning lasts one full window turn:
//! ```
//! use stream_metrics::metrics::moving_mean::MovingMean;
//!
//! let mut mm = MovingMean::new(2).unwrap();
//! assert_eq!(mm.update(1.0), 1.0);
//! assert!(mm.update(f64::NAN).is_nan());
//! assert!(mm.update(5.0).is_nan());      // NaN still stored
//! assert_eq!(mm.update(7.0), 6.0);       // NaN evicted: mean of [5, 7]
//! ```
//!
//! # Complexity
//! `update` is O(1) except for the recovery rescan, which is O(capacity) and
//! runs at most once per poisoning event. Memory is O(capacity), allocated
//! once at construction.
//!
//! # Panics
//! No method in this module intentionally panics.
//!
//! # See also
//! - [`crate::metrics::window::WindowBuffer`]: the circular store.
//! - [`crate::metrics::validate`]: window-size validation.

use compensated_summation::KahanBabuskaNeumaier;

use crate::metrics::validate::{window_size, InvalidWindow};
use crate::metrics::window::WindowBuffer;

/// Observable state of a [`MovingMean`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No sample absorbed yet; [`MovingMean::mean`] returns `None`.
    Empty,
    /// Fewer than `capacity` samples absorbed; incremental running mean.
    Filling,
    /// Window full, no NaN stored; O(1) sliding updates.
    Steady,
    /// A NaN sample is still inside the window; the mean reads NaN.
    Poisoned,
}

/// Diagnostic snapshot of a [`MovingMean`], in the crate's Out-bundle shape.
#[derive(Clone, Copy, Debug)]
pub struct MeanSnapshot {
    /// Current mean; `None` before the first sample, NaN while poisoned.
    pub mean: Option<f64>,
    /// Samples absorbed since construction, reset, or the last poisoning
    /// (a poisoning pins this at `capacity`).
    pub count: usize,
    /// Immutable window capacity.
    pub capacity: usize,
    /// Current phase.
    pub phase: Phase,
}

/// Moving mean over the most recent `capacity` samples.
///
/// One instance per stream. Mutable single-owner state: share across threads
/// only behind external synchronization.
#[derive(Clone, Debug)]
pub struct MovingMean {
    window: WindowBuffer,
    count: usize, // in [0, capacity]; pinned at capacity by poisoning
    head: usize,  // next slot to overwrite (the oldest once the window fills)
    mean: f64,    // NaN while poisoned; 0.0 before the first sample
}

impl MovingMean {
    /// Creates an accumulator over a window of `capacity` samples.
    ///
    /// Fails with [`InvalidWindow`] if `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, InvalidWindow> {
        if capacity == 0 {
            return Err(InvalidWindow::NotAPositiveInteger(0.0));
        }
        Ok(Self {
            window: WindowBuffer::new(capacity),
            count: 0,
            head: 0,
            mean: 0.0,
        })
    }

    /// Creates an accumulator from an untyped numeric window size.
    ///
    /// Boundary constructor for callers holding the size as a raw `f64`
    /// (config values, bridged scripting input). Fails with [`InvalidWindow`]
    /// unless the value is a finite, strictly positive integer.
    pub fn with_window(window: f64) -> Result<Self, InvalidWindow> {
        let capacity = window_size(window)?;
        Self::new(capacity)
    }

    /// Absorbs one sample and returns the updated mean (NaN while poisoned).
    pub fn update(&mut self, sample: f64) -> f64 {
        let capacity = self.window.capacity();
        let slot = self.head;
        self.head = self.window.wrap(self.head + 1);

        if sample.is_nan() {
            // Poison: behave as if the window filled instantly with
            // contamination. Cleared only once this slot is evicted.
            self.count = capacity;
            self.mean = f64::NAN;
        } else if self.count < capacity {
            // Filling: incremental running mean, no resummation.
            self.count += 1;
            self.mean += (sample - self.mean) / self.count as f64;
        } else if self.window.get(slot).is_nan() {
            // The poisoned slot is being evicted: rebuild the mean from the
            // surviving samples plus the incoming one, oldest first. Runs at
            // most once per poisoning event.
            self.count = 1;
            self.mean = sample;
            for stored in self.window.iter_from(slot + 1, capacity - 1) {
                if stored.is_nan() {
                    // Another NaN is still inside the window: re-poison.
                    self.count = capacity;
                    self.mean = f64::NAN;
                    break;
                }
                self.count += 1;
                self.mean += (stored - self.mean) / self.count as f64;
            }
        } else if !self.mean.is_nan() {
            // Steady state: exact O(1) sliding-window update.
            self.mean += (sample - self.window.get(slot)) / capacity as f64;
        }
        // else: poisoned and evicting a finite slot; the mean stays NaN
        // until the cursor reaches the contaminated slot.

        self.window.set(slot, sample);
        self.mean
    }

    /// Current mean without mutating state.
    ///
    /// `None` iff no sample has ever been absorbed; otherwise the mean,
    /// finite or NaN.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean)
        }
    }

    /// Immutable window capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Samples absorbed since construction, reset, or the last poisoning.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether a NaN sample is still inside the window.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.count > 0 && self.mean.is_nan()
    }

    /// Current phase of the update state machine.
    pub fn phase(&self) -> Phase {
        if self.count == 0 {
            Phase::Empty
        } else if self.mean.is_nan() {
            Phase::Poisoned
        } else if self.count < self.window.capacity() {
            Phase::Filling
        } else {
            Phase::Steady
        }
    }

    /// Snapshot of the current state using the [`MeanSnapshot`] shape.
    pub fn snapshot(&self) -> MeanSnapshot {
        MeanSnapshot {
            mean: self.mean(),
            count: self.count,
            capacity: self.window.capacity(),
            phase: self.phase(),
        }
    }

    /// Resets to the freshly constructed state, preserving the capacity.
    pub fn reset(&mut self) {
        self.window.clear();
        self.count = 0;
        self.head = 0;
        self.mean = 0.0;
    }

    /// From-scratch compensated (KBN) recomputation of the current window
    /// mean, oldest sample first.
    ///
    /// The incremental rules in [`update`](Self::update) trade bit-exactness
    /// for O(1) cost; this is the deterministic reference against which that
    /// drift can be bounded. Returns NaN while empty or poisoned.
    pub fn checked_mean(&self) -> f64 {
        if self.count == 0 || self.mean.is_nan() {
            return f64::NAN;
        }
        // While filling, samples occupy slots 0..count in write order; once
        // full, the oldest live sample sits at `head`.
        let start = if self.count < self.window.capacity() {
            0
        } else {
            self.head
        };
        let total = self
            .window
            .iter_from(start, self.count)
            .sum::<KahanBabuskaNeumaier<f64>>()
            .total();
        total / self.count as f64
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for finite samples of bounded magnitude.
    fn sample() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL.prop_filter("bounded finite", |x| x.is_finite() && x.abs() < 1e6)
    }

    fn stream(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(sample(), min_len..=max_len)
    }

    fn trailing_mean(xs: &[f64], i: usize, w: usize) -> f64 {
        let lo = (i + 1).saturating_sub(w);
        xs[lo..=i].iter().sum::<f64>() / (i + 1 - lo) as f64
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        // Every prefix of a short stream reports the exact running mean.
        #[test]
        fn prefix_means_while_filling(xs in stream(1, 64)) {
            let mut mm = MovingMean::new(xs.len()).unwrap();
            for (i, &x) in xs.iter().enumerate() {
                let got = mm.update(x);
                prop_assert!(close(got, trailing_mean(&xs, i, xs.len())),
                    "i={} got={} expect={}", i, got, trailing_mean(&xs, i, xs.len()));
            }
        }

        // Long streams report the mean of exactly the last w samples.
        #[test]
        fn sliding_means_match_trailing_window(xs in stream(8, 128), w in 1usize..16) {
            let mut mm = MovingMean::new(w).unwrap();
            for (i, &x) in xs.iter().enumerate() {
                let got = mm.update(x);
                prop_assert!(close(got, trailing_mean(&xs, i, w)),
                    "i={} w={} got={} expect={}", i, w, got, trailing_mean(&xs, i, w));
            }
        }

        // One NaN at position k poisons positions k..k+w-1 and the stream
        // recovers at k+w to the trailing-window mean.
        #[test]
        fn nan_poison_window_and_recovery(
            mut xs in stream(4, 96),
            w in 1usize..12,
            k_seed in 0usize..96,
        ) {
            let k = k_seed % xs.len();
            xs[k] = f64::NAN;
            // Make sure the stream runs past the recovery point.
            while xs.len() < k + w + 2 {
                xs.push(1.0);
            }
            let mut mm = MovingMean::new(w).unwrap();
            for (i, &x) in xs.iter().enumerate() {
                let got = mm.update(x);
                if (k..k + w).contains(&i) {
                    prop_assert!(got.is_nan(), "i={} expected NaN, got {}", i, got);
                } else {
                    prop_assert!(close(got, trailing_mean(&xs, i, w)),
                        "i={} got={} expect={}", i, got, trailing_mean(&xs, i, w));
                }
            }
        }

        // Open numerical question: the incremental rules and a from-scratch
        // compensated recomputation stay within tolerance of each other,
        // including immediately after a poison recovery.
        #[test]
        fn incremental_agrees_with_checked_recompute(
            mut xs in stream(8, 128),
            w in 1usize..16,
            poison_at in proptest::option::of(0usize..128),
        ) {
            if let Some(p) = poison_at {
                let p = p % xs.len();
                xs[p] = f64::NAN;
            }
            let mut mm = MovingMean::new(w).unwrap();
            for &x in &xs {
                let got = mm.update(x);
                let reference = mm.checked_mean();
                if got.is_nan() {
                    prop_assert!(reference.is_nan());
                } else {
                    prop_assert!(close(got, reference),
                        "got={} reference={}", got, reference);
                }
            }
        }

        // The mean is None before the first update and Some forever after.
        #[test]
        fn mean_presence(xs in stream(1, 32), w in 1usize..8) {
            let mut mm = MovingMean::new(w).unwrap();
            prop_assert_eq!(mm.mean(), None);
            for &x in &xs {
                mm.update(x);
                prop_assert!(mm.mean().is_some());
            }
        }
    }
}
