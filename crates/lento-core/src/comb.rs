//! Freeverb lowpass-feedback comb.

use crate::DelayLine;
use crate::flush_denormal;

/// Feedback comb with a one-pole lowpass inside the loop.
///
/// Each trip round the loop loses `feedback` in level and some treble to
/// the lowpass, so the echoes darken as they decay.
///
/// ```text
/// output    = slot[idx]
/// lowpass   = output * (1 - damping) + lowpass * damping
/// slot[idx] = input + lowpass * feedback
/// ```
///
/// # Example
///
/// ```rust
/// use lento_core::CombFilter;
///
/// let mut comb = CombFilter::new(3, 0.85, 0.4);
/// assert_eq!(comb.process(1.0), 0.0);
/// comb.process(0.0);
/// comb.process(0.0);
/// // The impulse comes back one loop later
/// assert_eq!(comb.process(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: DelayLine,
    feedback: f32,
    damping: f32,
    lowpass: f32,
}

impl CombFilter {
    /// Comb with a loop of `delay_samples`. Feedback is clamped to
    /// [0, 0.99] and damping, the lowpass weight on the previous loop
    /// state, to [0, 1].
    pub fn new(delay_samples: usize, feedback: f32, damping: f32) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            feedback: feedback.clamp(0.0, 0.99),
            damping: damping.clamp(0.0, 1.0),
            lowpass: 0.0,
        }
    }

    /// Run one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.oldest();
        self.lowpass = flush_denormal(output * (1.0 - self.damping) + self.lowpass * self.damping);
        self.delay.write(input + self.lowpass * self.feedback);
        output
    }

    /// Zero the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.lowpass = 0.0;
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}
