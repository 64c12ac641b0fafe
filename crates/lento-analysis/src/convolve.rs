//! FFT overlap-add convolution.
//!
//! Applies a reverb impulse response to a signal. Each input block of at
//! most `block_size` samples is zero-padded to `N = (block_size + K - 1)`
//! rounded up to a power of two, multiplied by the kernel spectrum, and
//! transformed back. The `K - 1` samples spilling past the block are carried
//! into the next block.

use crate::fft::Fft;
use lento_core::StereoBuffer;
use rustfft::num_complex::Complex;

/// Streaming overlap-add convolver for one kernel.
///
/// # Example
///
/// ```rust
/// use lento_analysis::Convolver;
///
/// let mut conv = Convolver::new(&[1.0, 0.5], 4);
/// let mut out = [0.0; 4];
/// conv.process_block(&[1.0, 0.0, 0.0, 0.0], &mut out);
/// assert!((out[1] - 0.5).abs() < 1e-6);
/// ```
pub struct Convolver {
    fft: Fft,
    kernel_spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    overlap: Vec<f32>,
    block_size: usize,
    kernel_len: usize,
}

impl Convolver {
    /// Prepare a convolver for `kernel` and input blocks of up to
    /// `block_size` samples.
    ///
    /// # Panics
    ///
    /// Panics if `kernel` is empty or `block_size` is zero.
    pub fn new(kernel: &[f32], block_size: usize) -> Self {
        assert!(!kernel.is_empty(), "convolution kernel must not be empty");
        assert!(block_size > 0, "block size must be non-zero");

        let fft_size = (block_size + kernel.len() - 1).next_power_of_two();
        let fft = Fft::new(fft_size);
        let kernel_spectrum = fft.forward_real(kernel);

        Self {
            fft,
            kernel_spectrum,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            overlap: vec![0.0; fft_size],
            block_size,
            kernel_len: kernel.len(),
        }
    }

    /// Largest block accepted by [`Convolver::process_block`].
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Kernel length in samples.
    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Convolve one block, writing `input.len()` samples to `output`.
    ///
    /// # Panics
    ///
    /// Panics if `input` is longer than the block size. Debug builds also
    /// panic if `output` differs in length from `input`.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        assert!(
            input.len() <= self.block_size,
            "block of {} exceeds convolver block size {}",
            input.len(),
            self.block_size
        );
        debug_assert_eq!(input.len(), output.len());

        let n = input.len();
        for (slot, &x) in self.scratch.iter_mut().zip(input) {
            *slot = Complex::new(x, 0.0);
        }
        self.scratch[n..].fill(Complex::new(0.0, 0.0));

        self.fft.forward_complex(&mut self.scratch);
        for (s, k) in self.scratch.iter_mut().zip(&self.kernel_spectrum) {
            *s *= *k;
        }
        self.fft.inverse_complex(&mut self.scratch);

        for (acc, s) in self.overlap.iter_mut().zip(&self.scratch) {
            *acc += s.re;
        }
        for (out, acc) in output.iter_mut().zip(&self.overlap[..n]) {
            *out = *acc;
        }
        self.overlap.copy_within(n.., 0);
        let len = self.overlap.len();
        self.overlap[len - n..].fill(0.0);
    }

    /// Drop any carried tail.
    pub fn reset(&mut self) {
        self.overlap.fill(0.0);
    }
}

/// Full linear convolution of `signal` with `kernel`.
///
/// Returns `signal.len() + kernel.len() - 1` samples, or nothing if either
/// input is empty.
pub fn convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + kernel.len() - 1;
    let block_size = kernel.len().next_power_of_two();
    let mut convolver = Convolver::new(kernel, block_size);
    let mut output = vec![0.0; out_len];
    let mut block = vec![0.0; block_size];

    for (start, out) in (0..out_len)
        .step_by(block_size)
        .zip(output.chunks_mut(block_size))
    {
        let len = out.len();
        let source = signal.get(start..).unwrap_or(&[]);
        let available = source.len().min(len);
        block[..available].copy_from_slice(&source[..available]);
        block[available..len].fill(0.0);
        convolver.process_block(&block[..len], out);
    }

    output
}

/// Convolve each channel of `signal` with the matching channel of `ir`.
pub fn convolve_stereo(signal: &StereoBuffer, ir: &StereoBuffer) -> StereoBuffer {
    StereoBuffer::new(
        convolve(&signal.left, &ir.left),
        convolve(&signal.right, &ir.right),
        signal.sample_rate,
    )
}
