//! Second-order IIR section and the low-shelf design behind the bass boost.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feed-forward taps.
    pub b: [f32; 3],
    /// Feedback taps `a1`, `a2`.
    pub a: [f32; 2],
}

impl BiquadCoefficients {
    /// Wire straight through.
    pub const IDENTITY: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
    };

    /// Divide every tap by `a0`.
    pub fn normalized(b: [f32; 3], a: [f32; 3]) -> Self {
        let inv = 1.0 / a[0];
        Self {
            b: [b[0] * inv, b[1] * inv, b[2] * inv],
            a: [a[1] * inv, a[2] * inv],
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Direct Form I biquad.
///
/// ```text
/// y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    inputs: [f32; 2],
    outputs: [f32; 2],
}

impl Biquad {
    /// Pass-through section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in new coefficients, keeping the filter history.
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let BiquadCoefficients { b, a } = self.coefficients;
        let [x1, x2] = self.inputs;
        let [y1, y2] = self.outputs;
        let output = b[0] * input + b[1] * x1 + b[2] * x2 - a[0] * y1 - a[1] * y2;
        self.inputs = [input, x1];
        self.outputs = [crate::flush_denormal(output), y1];
        output
    }

    /// Forget the history.
    pub fn clear(&mut self) {
        self.inputs = [0.0; 2];
        self.outputs = [0.0; 2];
    }
}

/// RBJ cookbook low shelf: `gain_db` below `frequency`, unity above.
///
/// `q = 0.707` is the steepest slope without overshoot (shelf slope S = 1).
pub fn low_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> BiquadCoefficients {
    let amp = powf(10.0, gain_db / 40.0);
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let shelf = 2.0 * sqrtf(amp) * sinf(w0) / (2.0 * q);
    let (up, down) = (amp + 1.0, amp - 1.0);

    BiquadCoefficients::normalized(
        [
            amp * (up - down * cos_w0 + shelf),
            2.0 * amp * (down - up * cos_w0),
            amp * (up - down * cos_w0 - shelf),
        ],
        [
            up + down * cos_w0 + shelf,
            -2.0 * (down + up * cos_w0),
            up + down * cos_w0 - shelf,
        ],
    )
}
