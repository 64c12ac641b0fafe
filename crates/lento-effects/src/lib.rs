//! Lento Effects - the slowed + reverb signal chain
//!
//! This crate provides the algorithmic pieces of the chain, built on lento-core:
//!
//! - [`synthesize_impulse_response`] - Freeverb-style hall impulse response
//! - [`synthesize_noise_impulse_response`] - Decaying-noise impulse response
//!   with an injectable random source
//! - [`ImpulseResponseSynth`] - Algorithm + parameters bundled as one request
//! - [`GrainProcessor`] - Real-time granular pitch shifter
//! - [`BassBoost`] - 100 Hz low shelf
//! - [`change_speed`] - Tape-style playback rate change
//!
//! ## Example
//!
//! ```rust
//! use lento_core::{BlockProcessor, BlockProcessorExt};
//! use lento_effects::{BassBoost, GrainProcessor};
//!
//! let mut shifter = GrainProcessor::default();
//! shifter.set_pitch_factor(1.0 / 0.85);
//!
//! let mut bass = BassBoost::new(44100.0);
//! bass.set_gain_db(3.0);
//!
//! // Pitch correction, then the shelf
//! let mut chain = shifter.chain(bass);
//! let mut block = vec![0.0f32; 512];
//! chain.process_block_inplace(&mut block);
//! assert_eq!(chain.latency_samples(), 4096);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bass;
pub mod impulse;
pub mod pitch_shifter;
pub mod speed;

// Re-export main types at crate root
pub use bass::BassBoost;
pub use impulse::{
    ImpulseResponseSynth, IrAlgorithm, ReverbParameters, hall_feedback_coefficient,
    synthesize_impulse_response, synthesize_noise_impulse_response, synthesize_noise_seeded,
};
pub use pitch_shifter::GrainProcessor;
pub use speed::{change_speed, change_speed_stereo};
