//! Reverb impulse response synthesis.
//!
//! Generates the stereo kernel a convolution reverb is loaded with. Two
//! algorithms are available and they are **not** interchangeable: their
//! lengths, envelopes and levels differ, so a kernel rendered with one
//! should never be compared sample-for-sample against the other.
//!
//! - [`IrAlgorithm::Hall`] (default): a Freeverb-style hall. A unit impulse
//!   plus eight early reflections is run through eight damped combs and four
//!   allpasses per channel, enveloped, smoothed and peak-normalized.
//! - [`IrAlgorithm::Noise`]: exponentially decaying white noise. Cheap, and
//!   reproducible when given a seeded random source.
//!
//! Every call is self-contained: filters and scratch buffers live for the
//! duration of one synthesis and nothing is shared between calls. Synthesis
//! allocates and is meant to run off the audio thread.
//!
//! # Example
//!
//! ```rust
//! use lento_effects::synthesize_impulse_response;
//!
//! let ir = synthesize_impulse_response(48000, 4.0, 1.0);
//! assert_eq!(ir.len(), 4 * 48000);
//! assert!(ir.peak() <= 1.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use lento_core::{AllpassFilter, CombFilter, OnePole, StereoBuffer};
use libm::{expf, floor, powf};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Freeverb comb delay times at 44.1 kHz.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Extra samples added to every right-channel comb for stereo width.
const STEREO_SPREAD: usize = 23;

/// Freeverb allpass delay times at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Reference sample rate for the tuning tables.
const REFERENCE_RATE: f32 = 44100.0;

/// Early reflection offsets (ms) and gains, left channel.
const EARLY_REFLECTIONS: [(f32, f32); 8] = [
    (8.0, 0.9),
    (15.0, 0.8),
    (22.0, 0.7),
    (32.0, 0.6),
    (45.0, 0.5),
    (58.0, 0.4),
    (75.0, 0.3),
    (95.0, 0.2),
];

/// Right-channel early reflections arrive this much later (ms).
const RIGHT_REFLECTION_SHIFT_MS: f32 = 3.0;

const COMB_DAMPING: f32 = 0.4;
const ROOM_SIZE: f32 = 0.85;
const ALLPASS_FEEDBACK: f32 = 0.5;
const ENVELOPE_SCALE: f32 = 0.7;
const WARMTH_COEFFICIENT: f32 = 0.2;
const NORMALIZE_PEAK: f32 = 0.9;

/// Noise envelope reaches `exp(-3)` (about 5%) at the last sample.
const NOISE_ENVELOPE_EXPONENT: f32 = 3.0;

/// Duration bounds (seconds) for the hall algorithm.
pub const HALL_DURATION_RANGE: (f32, f32) = (3.0, 6.0);

/// Decay-rate bounds for the hall algorithm.
pub const HALL_DECAY_RANGE: (f32, f32) = (0.3, 2.0);

/// Duration bounds (seconds) for the noise algorithm.
pub const NOISE_DURATION_RANGE: (f32, f32) = (1.5, 3.0);

/// Impulse response algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IrAlgorithm {
    /// Freeverb-style hall with early reflections.
    #[default]
    Hall,
    /// Exponentially decaying white noise.
    Noise,
}

impl IrAlgorithm {
    /// Lowercase name, as used on the command line and in settings files.
    pub fn name(&self) -> &'static str {
        match self {
            IrAlgorithm::Hall => "hall",
            IrAlgorithm::Noise => "noise",
        }
    }

    /// Parse a name produced by [`IrAlgorithm::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hall" => Some(IrAlgorithm::Hall),
            "noise" => Some(IrAlgorithm::Noise),
            _ => None,
        }
    }

    /// Duration bounds in seconds.
    pub fn duration_range(&self) -> (f32, f32) {
        match self {
            IrAlgorithm::Hall => HALL_DURATION_RANGE,
            IrAlgorithm::Noise => NOISE_DURATION_RANGE,
        }
    }
}

/// Duration and decay of a reverb tail.
///
/// Values are stored as given; [`ReverbParameters::clamped`] applies the
/// bounds of a particular algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Tail length in seconds.
    pub duration_seconds: f32,
    /// Envelope decay rate (hall only).
    pub decay_rate: f32,
}

impl ReverbParameters {
    /// Create parameters without clamping.
    pub fn new(duration_seconds: f32, decay_rate: f32) -> Self {
        Self {
            duration_seconds,
            decay_rate,
        }
    }

    /// Defaults for an algorithm: hall 4.0 s / 1.0, noise 2.0 s / 1.0.
    pub fn default_for(algorithm: IrAlgorithm) -> Self {
        match algorithm {
            IrAlgorithm::Hall => Self::new(4.0, 1.0),
            IrAlgorithm::Noise => Self::new(2.0, 1.0),
        }
    }

    /// Clamp into the bounds of `algorithm`.
    ///
    /// Decay is only clamped for the hall; the noise kernel ignores it.
    ///
    /// # Panics
    ///
    /// Panics if either value is NaN or infinite.
    pub fn clamped(self, algorithm: IrAlgorithm) -> Self {
        assert!(
            self.duration_seconds.is_finite(),
            "reverb duration must be finite, got {}",
            self.duration_seconds
        );
        assert!(
            self.decay_rate.is_finite(),
            "reverb decay must be finite, got {}",
            self.decay_rate
        );
        let (lo, hi) = algorithm.duration_range();
        let decay_rate = match algorithm {
            IrAlgorithm::Hall => self.decay_rate.clamp(HALL_DECAY_RANGE.0, HALL_DECAY_RANGE.1),
            IrAlgorithm::Noise => self.decay_rate,
        };
        Self {
            duration_seconds: self.duration_seconds.clamp(lo, hi),
            decay_rate,
        }
    }
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self::default_for(IrAlgorithm::Hall)
    }
}

/// A complete impulse response request: algorithm, parameters and an
/// optional seed for the noise algorithm.
///
/// # Example
///
/// ```rust
/// use lento_effects::{ImpulseResponseSynth, IrAlgorithm, ReverbParameters};
///
/// let synth = ImpulseResponseSynth::new(IrAlgorithm::Noise, ReverbParameters::new(2.0, 1.0))
///     .with_seed(7);
/// let a = synth.synthesize(44100);
/// let b = synth.synthesize(44100);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImpulseResponseSynth {
    algorithm: IrAlgorithm,
    params: ReverbParameters,
    seed: Option<u64>,
}

impl ImpulseResponseSynth {
    /// Create a request. Parameters are clamped at synthesis time.
    pub fn new(algorithm: IrAlgorithm, params: ReverbParameters) -> Self {
        Self {
            algorithm,
            params,
            seed: None,
        }
    }

    /// Seed the noise algorithm for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Selected algorithm.
    pub fn algorithm(&self) -> IrAlgorithm {
        self.algorithm
    }

    /// Parameters as given (unclamped).
    pub fn params(&self) -> ReverbParameters {
        self.params
    }

    /// Seed, if one was set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Length in samples the kernel will have at `sample_rate`.
    pub fn output_len(&self, sample_rate: u32) -> usize {
        let params = self.params.clamped(self.algorithm);
        impulse_len(sample_rate, params.duration_seconds)
    }

    /// Render the kernel.
    ///
    /// Without a seed the noise algorithm draws from the thread-local
    /// generator (or a fixed seed on `no_std` targets).
    pub fn synthesize(&self, sample_rate: u32) -> StereoBuffer {
        let ReverbParameters {
            duration_seconds,
            decay_rate,
        } = self.params;
        match (self.algorithm, self.seed) {
            (IrAlgorithm::Hall, _) => {
                synthesize_impulse_response(sample_rate, duration_seconds, decay_rate)
            }
            (IrAlgorithm::Noise, Some(seed)) => {
                synthesize_noise_seeded(seed, sample_rate, duration_seconds, decay_rate)
            }
            #[cfg(feature = "std")]
            (IrAlgorithm::Noise, None) => synthesize_noise_impulse_response(
                &mut rand::thread_rng(),
                sample_rate,
                duration_seconds,
                decay_rate,
            ),
            #[cfg(not(feature = "std"))]
            (IrAlgorithm::Noise, None) => {
                synthesize_noise_seeded(0, sample_rate, duration_seconds, decay_rate)
            }
        }
    }
}

/// Comb feedback implied by a -60 dB decay over `0.9 * duration`.
///
/// `0.001^(1 / (RT60 * sample_rate / 1000))`. The hall reports this value
/// but its combs run at the fixed 0.85 room size.
pub fn hall_feedback_coefficient(duration_seconds: f32, sample_rate: u32) -> f32 {
    let rt60 = duration_seconds * 0.9;
    powf(0.001, 1.0 / (rt60 * sample_rate as f32 / 1000.0))
}

/// `floor(duration * sample_rate)`, computed in double precision.
fn impulse_len(sample_rate: u32, duration_seconds: f32) -> usize {
    floor(f64::from(duration_seconds) * f64::from(sample_rate)) as usize
}

fn check_inputs(sample_rate: u32, duration_seconds: f32, decay_rate: f32) {
    assert!(sample_rate > 0, "sample rate must be non-zero");
    assert!(
        duration_seconds.is_finite() && decay_rate.is_finite(),
        "impulse response inputs must be finite (duration {duration_seconds}, decay {decay_rate})"
    );
}

fn scale_to_rate(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32 * sample_rate / REFERENCE_RATE) + 0.5).max(1.0) as usize
}

/// Synthesize a Freeverb-style hall impulse response.
///
/// Duration is clamped to 3–6 s and decay to 0.3–2.0. The result has
/// `floor(duration * sample_rate)` frames and a joint peak of 0.9.
///
/// # Panics
///
/// Panics if `sample_rate` is zero or either parameter is NaN or infinite.
pub fn synthesize_impulse_response(
    sample_rate: u32,
    duration_seconds: f32,
    decay_rate: f32,
) -> StereoBuffer {
    check_inputs(sample_rate, duration_seconds, decay_rate);
    let params =
        ReverbParameters::new(duration_seconds, decay_rate).clamped(IrAlgorithm::Hall);
    let len = impulse_len(sample_rate, params.duration_seconds);
    let sr = sample_rate as f32;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sample_rate,
        len,
        duration = params.duration_seconds,
        decay = params.decay_rate,
        rt60_feedback = hall_feedback_coefficient(params.duration_seconds, sample_rate),
        room_size = ROOM_SIZE,
        "synthesizing hall impulse response"
    );

    let left = render_hall_channel(len, sr, params.decay_rate, 0.0, 0);
    let right = render_hall_channel(
        len,
        sr,
        params.decay_rate,
        RIGHT_REFLECTION_SHIFT_MS,
        STEREO_SPREAD,
    );

    let mut ir = StereoBuffer::new(left, right, sample_rate);
    let _gain = ir.normalize(NORMALIZE_PEAK);

    #[cfg(feature = "tracing")]
    tracing::debug!(gain = _gain, peak = ir.peak(), "hall impulse response ready");

    ir
}

/// One hall channel before normalization.
fn render_hall_channel(
    len: usize,
    sample_rate: f32,
    decay_rate: f32,
    reflection_shift_ms: f32,
    comb_spread: usize,
) -> Vec<f32> {
    let mut excitation = vec![0.0f32; len];
    if let Some(first) = excitation.first_mut() {
        *first = 1.0;
    }
    for (ms, gain) in EARLY_REFLECTIONS {
        let index = ((ms + reflection_shift_ms) * sample_rate / 1000.0) as usize;
        if let Some(slot) = excitation.get_mut(index) {
            *slot += gain;
        }
    }

    let mut combs: [CombFilter; 8] = core::array::from_fn(|i| {
        CombFilter::new(
            scale_to_rate(COMB_TUNINGS_44K[i] + comb_spread, sample_rate),
            ROOM_SIZE,
            COMB_DAMPING,
        )
    });
    let mut allpasses: [AllpassFilter; 4] = core::array::from_fn(|i| {
        let mut ap = AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate));
        ap.set_feedback(ALLPASS_FEEDBACK);
        ap
    });
    let mut warmth = OnePole::with_coefficient(WARMTH_COEFFICIENT);
    let comb_scale = 1.0 / combs.len() as f32;
    let envelope_rate = -decay_rate * ENVELOPE_SCALE / sample_rate;

    for (i, sample) in excitation.iter_mut().enumerate() {
        let input = *sample;
        let mut diffuse = combs.iter_mut().map(|c| c.process(input)).sum::<f32>() * comb_scale;
        for ap in &mut allpasses {
            diffuse = ap.process(diffuse);
        }
        let envelope = expf(envelope_rate * i as f32);
        *sample = warmth.process(diffuse * envelope);
    }

    excitation
}

/// Synthesize an exponentially decaying noise impulse response.
///
/// Duration is clamped to 1.5–3 s. Each channel draws independent samples
/// in [-1, 1] from `rng`, scaled by `exp(-3 i / len)`. `decay_rate` is
/// accepted for call-site symmetry with the hall and otherwise unused.
///
/// # Panics
///
/// Panics if `sample_rate` is zero or either parameter is NaN or infinite.
pub fn synthesize_noise_impulse_response<R: Rng + ?Sized>(
    rng: &mut R,
    sample_rate: u32,
    duration_seconds: f32,
    decay_rate: f32,
) -> StereoBuffer {
    check_inputs(sample_rate, duration_seconds, decay_rate);
    let params =
        ReverbParameters::new(duration_seconds, decay_rate).clamped(IrAlgorithm::Noise);
    let len = impulse_len(sample_rate, params.duration_seconds);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sample_rate,
        len,
        duration = params.duration_seconds,
        "synthesizing noise impulse response"
    );

    let envelope_rate = -NOISE_ENVELOPE_EXPONENT / len.max(1) as f32;
    let mut left = Vec::with_capacity(len);
    let mut right = Vec::with_capacity(len);
    for i in 0..len {
        let envelope = expf(envelope_rate * i as f32);
        left.push(rng.gen_range(-1.0f32..=1.0) * envelope);
        right.push(rng.gen_range(-1.0f32..=1.0) * envelope);
    }

    StereoBuffer::new(left, right, sample_rate)
}

/// [`synthesize_noise_impulse_response`] with a `StdRng` seeded from `seed`.
pub fn synthesize_noise_seeded(
    seed: u64,
    sample_rate: u32,
    duration_seconds: f32,
    decay_rate: f32,
) -> StereoBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    synthesize_noise_impulse_response(&mut rng, sample_rate, duration_seconds, decay_rate)
}
