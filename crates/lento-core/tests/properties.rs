//! Property-based tests for lento-core DSP primitives.
//!
//! Tests filter stability, delay line ordering and buffer normalization
//! using proptest for randomized input generation.

use proptest::prelude::*;
use lento_core::{
    AllpassFilter, Biquad, CombFilter, DelayLine, OnePole, StereoBuffer,
    hann_window, low_shelf_coefficients,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Low shelf stays finite for any shelf frequency and boost in the
    /// bass boost range.
    #[test]
    fn low_shelf_stability(
        freq in 20.0f32..400.0f32,
        gain_db in 0.0f32..=12.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(low_shelf_coefficients(freq, 0.707, gain_db, 48000.0));

        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(
                out.is_finite(),
                "Low shelf (freq={}, gain={}) produced non-finite output {} for input {}",
                freq, gain_db, out, sample
            );
        }
    }

    /// A comb filter with feedback below unity stays bounded.
    #[test]
    fn comb_bounded(
        delay in 10usize..2000,
        feedback in 0.0f32..0.99,
        damp in 0.0f32..=1.0,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut comb = CombFilter::new(delay, feedback, damp);
        for _ in 0..8 {
            for &sample in &input {
                let out = comb.process(sample);
                prop_assert!(out.is_finite());
                prop_assert!(out.abs() < 100.0, "comb output {} unbounded", out);
            }
        }
    }

    /// Allpass output never exceeds twice the largest input magnitude
    /// over one pass.
    #[test]
    fn allpass_bounded(
        delay in 1usize..1000,
        feedback in -0.9f32..0.9,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut allpass = AllpassFilter::new(delay);
        allpass.set_feedback(feedback);
        for &sample in &input {
            let out = allpass.process(sample);
            prop_assert!(out.is_finite());
            prop_assert!(out.abs() <= 2.0 + 1e-4);
        }
    }

    /// One-pole output stays inside the range of its input.
    #[test]
    fn one_pole_within_input_range(
        coeff in 0.001f32..=1.0,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut lp = OnePole::with_coefficient(coeff);
        for &sample in &input {
            let out = lp.process(sample);
            prop_assert!(out.abs() <= 1.0 + 1e-5);
        }
    }

    /// The oldest slot is always the sample pushed `capacity` writes ago.
    #[test]
    fn delay_line_lags_by_capacity(
        capacity in 1usize..512,
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..1024),
    ) {
        let mut line = DelayLine::new(capacity);
        for (i, &sample) in input.iter().enumerate() {
            let expected = if i >= capacity { input[i - capacity] } else { 0.0 };
            prop_assert_eq!(line.oldest(), expected, "step {}", i);
            line.write(sample);
        }
    }

    /// Normalization hits the target peak and never raises a clipped pair
    /// above one.
    #[test]
    fn normalize_reaches_target(
        left in prop::collection::vec(-4.0f32..=4.0f32, 1..128),
        target in 0.1f32..=1.0,
    ) {
        let right: Vec<f32> = left.iter().map(|s| -s * 0.5).collect();
        let mut buffer = StereoBuffer::new(left, right, 48000);
        let before = buffer.peak();
        buffer.normalize(target);

        if before > 0.0 {
            prop_assert!((buffer.peak() - target).abs() < 1e-4);
        } else {
            prop_assert_eq!(buffer.peak(), 0.0);
        }
    }

    /// Hann windows stay in [0, 1] and are symmetric.
    #[test]
    fn hann_bounded_and_symmetric(len in 2usize..4097) {
        let w = hann_window(len);
        for i in 0..len {
            prop_assert!((0.0..=1.0).contains(&w[i]));
            prop_assert!((w[i] - w[len - 1 - i]).abs() < 1e-5);
        }
    }
}
