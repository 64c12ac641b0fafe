//! Impulse response synthesis command.

use crate::commands::common::{check_bit_depth, parse_algorithm};
use clap::Args;
use lento_analysis::estimate_rt60;
use lento_config::Algorithm;
use lento_core::linear_to_db;
use lento_effects::{
    ImpulseResponseSynth, IrAlgorithm, ReverbParameters, hall_feedback_coefficient,
};
use lento_io::write_wav_stereo;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImpulseArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Algorithm: hall or noise
    #[arg(short, long, default_value = "hall", value_parser = parse_algorithm)]
    algorithm: Algorithm,

    /// Tail length in seconds (hall 3-6, noise 1.5-3)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Envelope decay rate (hall only, 0.3-2)
    #[arg(long)]
    decay: Option<f32>,

    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Seed for the noise algorithm
    #[arg(long)]
    seed: Option<u64>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    check_bit_depth(args.bit_depth)?;
    if args.sample_rate == 0 {
        anyhow::bail!("sample rate must be non-zero");
    }

    let algorithm = IrAlgorithm::from(args.algorithm);
    let defaults = ReverbParameters::default_for(algorithm);
    let requested = ReverbParameters::new(
        args.duration.unwrap_or(defaults.duration_seconds),
        args.decay.unwrap_or(defaults.decay_rate),
    );
    if !requested.duration_seconds.is_finite() || !requested.decay_rate.is_finite() {
        anyhow::bail!("duration and decay must be finite numbers");
    }

    let params = requested.clamped(algorithm);
    if params != requested {
        tracing::warn!(
            duration = params.duration_seconds,
            decay = params.decay_rate,
            "parameters clamped into range"
        );
    }

    let mut synth = ImpulseResponseSynth::new(algorithm, params);
    if let Some(seed) = args.seed {
        synth = synth.with_seed(seed);
    }

    println!(
        "Synthesizing {} impulse response: {:.2}s at {} Hz...",
        algorithm.name(),
        params.duration_seconds,
        args.sample_rate
    );
    let ir = synth.synthesize(args.sample_rate);

    println!("  {} samples per channel", ir.len());
    println!("  Peak: {:.1} dB", linear_to_db(ir.peak()));
    if algorithm == IrAlgorithm::Hall {
        println!(
            "  Feedback for a {:.2}s RT60: {:.6}",
            params.duration_seconds * 0.9,
            hall_feedback_coefficient(params.duration_seconds, args.sample_rate)
        );
    }
    if let Some(rt) = estimate_rt60(&ir.left, args.sample_rate as f32) {
        println!("  Measured RT60: {:.2}s", rt.rt60_seconds);
    }

    write_wav_stereo(&args.output, &ir, args.bit_depth)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
