//! Analysis windows for grain-based processing.
//!
//! The grain processor multiplies every grain by a symmetric Hann window:
//!
//! ```text
//! w[i] = 0.5 * (1 - cos(2π i / (N - 1)))
//! ```
//!
//! Symmetric (not periodic) so both ends of a grain are exactly zero. At 50%
//! overlap the summed windows are within a fraction of a percent of unity.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::f32::consts::PI;
use libm::cosf;

/// Fill `buffer` with a symmetric Hann window of `buffer.len()` points.
///
/// A single-point window is `[1.0]`; an empty buffer is left untouched.
pub fn fill_hann(buffer: &mut [f32]) {
    let n = buffer.len();
    if n == 1 {
        buffer[0] = 1.0;
        return;
    }
    let denom = (n - 1) as f32;
    for (i, w) in buffer.iter_mut().enumerate() {
        *w = 0.5 * (1.0 - cosf(2.0 * PI * i as f32 / denom));
    }
}

/// Allocate a symmetric Hann window of `len` points.
///
/// # Example
///
/// ```rust
/// use lento_core::hann_window;
///
/// let w = hann_window(5);
/// assert_eq!(w[0], 0.0);
/// assert!((w[2] - 1.0).abs() < 1e-6);
/// ```
pub fn hann_window(len: usize) -> Vec<f32> {
    let mut window = vec![0.0; len];
    fill_hann(&mut window);
    window
}
