//! Playback-rate change by linear interpolation.
//!
//! Changes tempo and pitch together, like speeding up or slowing down a
//! tape. A rate of 0.85 produces a buffer 1/0.85 times as long, pitched
//! down by the same ratio; [`GrainProcessor`](crate::GrainProcessor) with a
//! pitch factor of `1 / rate` undoes the pitch change.
//!
//! ```text
//! out[j] = lerp(in[⌊j·rate⌋], in[⌊j·rate⌋ + 1], frac(j·rate))
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use lento_core::{StereoBuffer, lerp};

/// Resample `input` so it plays back `rate` times faster.
///
/// The output has `floor(input.len() / rate)` samples. The last input
/// sample is held when interpolation runs off the end.
///
/// # Panics
///
/// Panics if `rate` is not finite and positive.
pub fn change_speed(input: &[f32], rate: f32) -> Vec<f32> {
    assert!(
        rate.is_finite() && rate > 0.0,
        "playback rate must be finite and positive, got {rate}"
    );
    let Some(&last) = input.last() else {
        return Vec::new();
    };

    let rate = f64::from(rate);
    let out_len = libm::floor(input.len() as f64 / rate) as usize;
    (0..out_len)
        .map(|j| {
            let pos = j as f64 * rate;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let a = input.get(idx).copied().unwrap_or(last);
            let b = input.get(idx + 1).copied().unwrap_or(last);
            lerp(a, b, frac)
        })
        .collect()
}

/// [`change_speed`] applied to both channels. The sample rate is kept.
pub fn change_speed_stereo(input: &StereoBuffer, rate: f32) -> StereoBuffer {
    StereoBuffer::new(
        change_speed(&input.left, rate),
        change_speed(&input.right, rate),
        input.sample_rate,
    )
}
