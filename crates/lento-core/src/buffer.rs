//! Owned stereo sample buffer.
//!
//! [`StereoBuffer`] is the output of the impulse response synthesizer and the
//! interchange type for stereo audio across the workspace. Both channels
//! always have the same length.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// A pair of equal-length channels with their sample rate.
///
/// # Example
///
/// ```rust
/// use lento_core::StereoBuffer;
///
/// let buffer = StereoBuffer::new(vec![1.0, 0.5], vec![0.5, -0.25], 48000);
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.peak(), 1.0);
/// assert_eq!(buffer.to_interleaved(), vec![1.0, 0.5, 0.5, -0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl StereoBuffer {
    /// Number of channels in every stereo buffer.
    pub const CHANNELS: usize = 2;

    /// Create a buffer from left and right channels.
    ///
    /// # Panics
    ///
    /// Panics if the channels differ in length.
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        assert_eq!(left.len(), right.len(), "Channels must have same length");
        Self {
            left,
            right,
            sample_rate,
        }
    }

    /// Create a zeroed buffer of `len` samples per channel.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], vec![0.0; len], sample_rate)
    }

    /// Create a buffer by duplicating a mono signal to both channels.
    pub fn from_mono(mono: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
            sample_rate,
        }
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Always 2.
    pub fn channels(&self) -> usize {
        Self::CHANNELS
    }

    /// Borrow a channel by index (0 = left, 1 = right).
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        match index {
            0 => Some(&self.left),
            1 => Some(&self.right),
            _ => None,
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Scale both channels so the joint peak equals `target`.
    ///
    /// Silent buffers are left untouched. Returns the gain applied.
    pub fn normalize(&mut self, target: f32) -> f32 {
        let peak = self.peak();
        if peak <= 0.0 {
            return 1.0;
        }
        let gain = target / peak;
        for s in self.left.iter_mut().chain(self.right.iter_mut()) {
            *s = (*s * gain).clamp(-1.0, 1.0);
        }
        gain
    }

    /// Average the two channels into one.
    pub fn to_mono(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect()
    }

    /// Interleave as `[L0, R0, L1, R1, ...]`.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            out.push(*l);
            out.push(*r);
        }
        out
    }
}
