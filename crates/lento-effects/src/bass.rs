//! Bass boost low shelf.

use lento_core::{Biquad, BlockProcessor, low_shelf_coefficients};

/// Shelf midpoint in Hz.
pub const SHELF_FREQUENCY_HZ: f32 = 100.0;

/// Shelf Q.
pub const SHELF_Q: f32 = 0.707;

/// Low-shelf boost below 100 Hz.
///
/// Gain comes from the bass boost percentage through
/// `lento_config::mapping::bass_boost_gain_db`. One instance per channel.
///
/// # Example
///
/// ```rust
/// use lento_effects::BassBoost;
///
/// let mut bass = BassBoost::new(48000.0);
/// bass.set_gain_db(6.0);
/// let out = bass.process(0.25);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct BassBoost {
    biquad: Biquad,
    gain_db: f32,
    sample_rate: f32,
}

impl BassBoost {
    /// Create a flat (0 dB) shelf.
    pub fn new(sample_rate: f32) -> Self {
        let mut boost = Self {
            biquad: Biquad::new(),
            gain_db: 0.0,
            sample_rate,
        };
        boost.update_coefficients();
        boost
    }

    /// Set the shelf gain in dB. Non-finite values are ignored.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if !gain_db.is_finite() {
            return;
        }
        self.gain_db = gain_db;
        self.update_coefficients();
    }

    /// Current shelf gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    fn update_coefficients(&mut self) {
        self.biquad.set_coefficients(low_shelf_coefficients(
            SHELF_FREQUENCY_HZ,
            SHELF_Q,
            self.gain_db,
            self.sample_rate,
        ));
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }
}

impl BlockProcessor for BassBoost {
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.biquad.process(sample);
        }
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.biquad.process(*sample);
        }
    }

    fn reset(&mut self) {
        self.biquad.clear();
    }
}
