//! Fixed-length circular delay line.
//!
//! Storage for the comb and allpass loops of the hall synthesizer. Each
//! loop only ever taps its full length, so the line exposes the oldest
//! slot and a push. Memory is claimed once in the constructor.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Circular buffer delaying its input by exactly `capacity()` samples.
///
/// ```rust
/// use lento_core::DelayLine;
///
/// let mut line = DelayLine::new(2);
/// line.write(0.5);
/// line.write(0.25);
/// assert_eq!(line.oldest(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    slots: Vec<f32>,
    head: usize,
}

impl DelayLine {
    /// Line holding `len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "delay line needs at least one slot");
        Self {
            slots: vec![0.0; len],
            head: 0,
        }
    }

    /// Oldest slot, the one the next write replaces.
    #[inline]
    pub fn oldest(&self) -> f32 {
        self.slots[self.head]
    }

    /// Push a sample, dropping the oldest.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.slots[self.head] = sample;
        self.head += 1;
        if self.head == self.slots.len() {
            self.head = 0;
        }
    }

    /// Zero every slot.
    pub fn clear(&mut self) {
        self.slots.fill(0.0);
        self.head = 0;
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
