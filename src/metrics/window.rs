//! Module: `metrics::window`
//!
//! Fixed-capacity circular storage for `f64` samples. All indexing is modulo
//! capacity; the buffer never grows or shrinks. Cursor bookkeeping lives in
//! the accumulator, not here.

/// Fixed-length circular sample store.
#[derive(Clone, Debug)]
pub struct WindowBuffer {
    slots: Box<[f64]>,
}

impl WindowBuffer {
    /// Allocates `capacity` zeroed slots. Slots are never read before they
    /// are first written by the owning accumulator.
    ///
    /// # Panics
    /// Panics if `capacity == 0`; the public constructors in
    /// [`crate::metrics::moving_mean`] validate before reaching this point.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "WindowBuffer requires capacity >= 1");
        Self {
            slots: vec![0.0; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Wraps a logical index into the slot range.
    #[inline]
    pub fn wrap(&self, idx: usize) -> usize {
        idx % self.slots.len()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> f64 {
        self.slots[self.wrap(idx)]
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: f64) {
        let i = self.wrap(idx);
        self.slots[i] = value;
    }

    /// Iterates `len` slots starting at `start`, wrapping around the end.
    /// Used by the recovery rescan and the checked recomputation, which both
    /// need the stored samples in a fixed, reproducible order.
    pub fn iter_from(&self, start: usize, len: usize) -> impl Iterator<Item = f64> + '_ {
        debug_assert!(len <= self.slots.len());
        (0..len).map(move |i| self.slots[(start + i) % self.slots.len()])
    }

    /// Resets every slot to 0.0.
    pub fn clear(&mut self) {
        self.slots.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_modulo_capacity() {
        let mut w = WindowBuffer::new(3);
        w.set(0, 1.0);
        w.set(4, 2.0); // slot 1
        assert_eq!(w.get(0), 1.0);
        assert_eq!(w.get(1), 2.0);
        assert_eq!(w.get(3), 1.0);
        assert_eq!(w.capacity(), 3);
    }

    #[test]
    fn iter_from_wraps_in_order() {
        let mut w = WindowBuffer::new(4);
        for i in 0..4 {
            w.set(i, i as f64);
        }
        let got: Vec<f64> = w.iter_from(2, 4).collect();
        assert_eq!(got, vec![2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn clear_zeroes_all_slots() {
        let mut w = WindowBuffer::new(2);
        w.set(0, 9.0);
        w.set(1, 9.0);
        w.clear();
        assert_eq!(w.get(0), 0.0);
        assert_eq!(w.get(1), 0.0);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        WindowBuffer::new(0);
    }
}
