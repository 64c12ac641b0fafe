//! Lento Core - DSP primitives for the slowed + reverb pipeline
//!
//! This crate provides the building blocks shared by the impulse response
//! synthesizer and the granular pitch shifter. Everything here is designed
//! for real-time use: buffers are allocated at construction and never in
//! the processing path.
//!
//! # Core Abstractions
//!
//! - [`BlockProcessor`] - Object-safe trait for fixed-block audio processors
//! - [`SharedParam`] - Lock-free f32 cell for block-rate ("k-rate") parameters
//! - [`StereoBuffer`] - Owned left/right sample pair with a sample rate
//!
//! ## Filters
//!
//! - [`CombFilter`] - Freeverb comb filter with damping in the feedback path
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//! - [`OnePole`] - One-pole lowpass / smoother
//! - [`Biquad`] - Second-order IIR with RBJ cookbook coefficients
//!
//! ## Delay Lines and Windows
//!
//! - [`DelayLine`] - Fixed-length ring buffer for comb and allpass loops
//! - [`hann_window`] / [`fill_hann`] - Symmetric Hann window for grains
//!
//! ## Utilities
//!
//! - [`db_to_linear`], [`linear_to_db`], [`flush_denormal`], [`lerp`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use the crate on targets without an
//! operating system:
//!
//! ```toml
//! [dependencies]
//! lento-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod buffer;
pub mod comb;
pub mod delay;
pub mod math;
pub mod one_pole;
pub mod processor;
pub mod shared_param;
pub mod window;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use biquad::{Biquad, BiquadCoefficients, low_shelf_coefficients};
pub use buffer::StereoBuffer;
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use math::{db_to_linear, flush_denormal, lerp, linear_to_db, wrap_index};
pub use one_pole::OnePole;
pub use processor::{BlockProcessor, BlockProcessorExt, Chain};
pub use shared_param::SharedParam;
pub use window::{fill_hann, hann_window};
