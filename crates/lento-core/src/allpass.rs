//! Schroeder allpass diffuser.

use crate::DelayLine;
use crate::flush_denormal;

/// Allpass stage that smears a comb bank's echoes into a diffuse tail.
///
/// ```text
/// held      = slot[idx]
/// output    = held - input * gain
/// slot[idx] = input + held * gain
/// ```
///
/// This is the Freeverb form: the feed-forward path uses the raw input, so
/// the response is only approximately flat. A cascade of these spreads
/// energy in time without tinting the tail much.
///
/// # Example
///
/// ```rust
/// use lento_core::AllpassFilter;
///
/// let mut diffuser = AllpassFilter::new(4);
/// diffuser.set_feedback(0.5);
/// assert_eq!(diffuser.process(1.0), -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    gain: f32,
}

impl AllpassFilter {
    /// Diffuser with a `delay_samples` loop and gain 0.5.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            gain: 0.5,
        }
    }

    /// Loop gain, clamped to ±0.99.
    #[inline]
    pub fn set_feedback(&mut self, gain: f32) {
        self.gain = gain.clamp(-0.99, 0.99);
    }

    /// Loop gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.gain
    }

    /// Run one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let held = self.delay.oldest();
        self.delay.write(flush_denormal(input + held * self.gain));
        held - input * self.gain
    }

    /// Zero the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_response(diffuser: &mut AllpassFilter, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| diffuser.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect()
    }

    #[test]
    fn impulse_reappears_after_one_loop() {
        let mut diffuser = AllpassFilter::new(6);
        diffuser.set_feedback(0.5);
        let ir = impulse_response(&mut diffuser, 19);
        assert_eq!(ir[0], -0.5);
        assert!(ir[1..6].iter().all(|s| *s == 0.0));
        // Full level on the first return, then gain times that per loop
        assert_eq!(ir[6], 1.0);
        assert_eq!(ir[12], 0.5);
        assert_eq!(ir[18], 0.25);
    }

    #[test]
    fn tail_decays_for_negative_gain() {
        let mut diffuser = AllpassFilter::new(11);
        diffuser.set_feedback(-0.6);
        let ir = impulse_response(&mut diffuser, 4000);
        assert!(ir.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        assert!(ir[3000..].iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn gain_is_clamped() {
        let mut diffuser = AllpassFilter::new(3);
        diffuser.set_feedback(4.0);
        assert_eq!(diffuser.feedback(), 0.99);
        diffuser.set_feedback(-4.0);
        assert_eq!(diffuser.feedback(), -0.99);
    }

    #[test]
    fn clear_forgets_history() {
        let mut diffuser = AllpassFilter::new(9);
        for _ in 0..30 {
            diffuser.process(0.8);
        }
        diffuser.clear();
        assert!((0..20).all(|_| diffuser.process(0.0) == 0.0));
    }
}
