//! Lento Analysis - offline convolution and impulse response metrics
//!
//! - [`fft`] - rustfft wrapper with cached forward/inverse plans
//! - [`convolve`] - FFT overlap-add convolution, one-shot and streaming
//! - [`ir`] - Energy decay curve, RT60 estimate and level helpers
//!
//! ## Example
//!
//! ```rust
//! use lento_analysis::{convolve, estimate_rt60};
//!
//! // Exponential decay reaching -60 dB after one second
//! let sr = 8000.0;
//! let ir: Vec<f32> = (0..16000)
//!     .map(|i| (-6.9078 * i as f32 / sr).exp() * if i % 2 == 0 { 1.0 } else { -1.0 })
//!     .collect();
//!
//! let rt60 = estimate_rt60(&ir, sr).unwrap();
//! assert!((rt60.rt60_seconds - 1.0).abs() < 0.1);
//!
//! let wet = convolve(&[1.0, 0.5], &ir);
//! assert_eq!(wet.len(), 2 + ir.len() - 1);
//! ```

pub mod convolve;
pub mod fft;
pub mod ir;

pub use convolve::{Convolver, convolve, convolve_stereo};
pub use fft::Fft;
pub use ir::{Rt60Estimate, energy, energy_decay_curve, estimate_rt60, peak, rms};
