//! Single-pole lowpass.
//!
//! ```text
//! y[n] = y[n-1] + k * (x[n] - y[n-1])
//! ```
//!
//! `k` lies in (0, 1]. The hall synthesizer runs its output through one of
//! these with `k = 0.2` to take the fizz off the top of the tail.

use crate::flush_denormal;

/// Leaky-integrator lowpass, 6 dB per octave.
///
/// ```rust
/// use lento_core::OnePole;
///
/// let mut warmth = OnePole::with_coefficient(0.2);
/// assert!((warmth.process(1.0) - 0.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    k: f32,
    last: f32,
}

impl OnePole {
    /// Lowpass from a raw coefficient, clamped to (0, 1].
    pub fn with_coefficient(k: f32) -> Self {
        Self {
            k: k.clamp(f32::EPSILON, 1.0),
            last: 0.0,
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.last = flush_denormal(self.last + self.k * (input - self.last));
        self.last
    }

    /// Back to silence.
    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}
