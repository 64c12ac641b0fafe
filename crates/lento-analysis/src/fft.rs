//! FFT wrapper with cached plans.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward/inverse complex FFT pair for one size.
///
/// The inverse is normalized by `1/size`, so a forward/inverse pair is the
/// identity.
pub struct Fft {
    planner: FftPlanner<f32>,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Plan transforms of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            planner,
            forward,
            inverse,
            size,
        }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Re-plan for a new size. No-op if the size is unchanged.
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.forward = self.planner.plan_fft_forward(size);
            self.inverse = self.planner.plan_fft_inverse(size);
            self.size = size;
        }
    }

    /// Zero-pad (or truncate) real `input` to the transform size and return
    /// its full complex spectrum.
    pub fn forward_real(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.forward.process(&mut buffer);
        buffer
    }

    /// Forward transform in place.
    pub fn forward_complex(&self, buffer: &mut [Complex<f32>]) {
        self.forward.process(buffer);
    }

    /// Normalized inverse transform in place.
    pub fn inverse_complex(&self, buffer: &mut [Complex<f32>]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// Magnitude spectrum in dB, floored at -200 dB.
pub fn magnitude_db(spectrum: &[Complex<f32>]) -> Vec<f32> {
    spectrum
        .iter()
        .map(|c| lento_core::linear_to_db(c.norm()))
        .collect()
}
