//! Integration tests: synthesized kernels measured with lento-analysis, and
//! the pitch-corrected slowdown chain.

use lento_analysis::{convolve, energy_decay_curve, estimate_rt60, rms};
use lento_core::{BlockProcessor, BlockProcessorExt};
use lento_effects::{
    BassBoost, GrainProcessor, ImpulseResponseSynth, IrAlgorithm, ReverbParameters,
    change_speed, synthesize_impulse_response,
};

#[test]
fn hall_tail_shortens_with_decay() {
    let gentle = synthesize_impulse_response(16000, 4.0, 0.3);
    let steep = synthesize_impulse_response(16000, 4.0, 2.0);

    let gentle_rt = estimate_rt60(&gentle.left, 16000.0).expect("hall decays");
    let steep_rt = estimate_rt60(&steep.left, 16000.0).expect("hall decays");
    assert!(
        steep_rt.rt60_seconds < gentle_rt.rt60_seconds,
        "steep {} vs gentle {}",
        steep_rt.rt60_seconds,
        gentle_rt.rt60_seconds
    );
    assert!(gentle_rt.rt60_seconds > 0.2 && gentle_rt.rt60_seconds < 4.0);
}

#[test]
fn noise_decay_matches_envelope() {
    // Under exp(-3 i / len) the last 5% of the kernel holds about -30 dB
    // of its energy.
    let ir = ImpulseResponseSynth::new(IrAlgorithm::Noise, ReverbParameters::new(2.0, 1.0))
        .with_seed(11)
        .synthesize(8000);
    let edc = energy_decay_curve(&ir.left);
    let late = edc[edc.len() - 800];
    assert!(late < -25.0, "EDC near the end is {late} dB");
}

#[test]
fn convolving_with_hall_spreads_an_impulse() {
    let ir = synthesize_impulse_response(8000, 3.0, 1.0);
    let mut click = vec![0.0f32; 100];
    click[0] = 1.0;
    let wet = convolve(&click, &ir.left);
    assert_eq!(wet.len(), 100 + ir.len() - 1);
    for (a, b) in wet.iter().zip(&ir.left) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn slowed_and_pitch_corrected_keeps_level() {
    let sample_rate = 16000.0;
    let speed = 0.85;
    let tone: Vec<f32> = (0..32000)
        .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate).sin() * 0.5)
        .collect();

    let slowed = change_speed(&tone, speed);
    assert_eq!(slowed.len(), (32000.0 / f64::from(speed)).floor() as usize);

    let mut shifter = GrainProcessor::new(1024, 0.5);
    shifter.set_pitch_factor(1.0 / speed);
    let mut chain = shifter.chain(BassBoost::new(sample_rate));

    let mut out = slowed.clone();
    for block in out.chunks_mut(128) {
        chain.process_block_inplace(block);
    }

    let latency = chain.latency_samples();
    assert_eq!(latency, 2048);
    let settled = &out[latency + 1024..];
    let level = rms(settled);
    let reference = rms(&slowed[latency + 1024..]);
    assert!(
        (level / reference - 1.0).abs() < 0.35,
        "rms {level} vs {reference}"
    );
}
