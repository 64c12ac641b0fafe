//! Granular pitch shift command.

use crate::commands::common::{check_bit_depth, print_levels, process_aligned, progress_bar};
use clap::Args;
use lento_core::{BlockProcessor, StereoBuffer};
use lento_effects::GrainProcessor;
use lento_effects::pitch_shifter::{
    DEFAULT_GRAIN_SIZE, DEFAULT_OVERLAP, MAX_GRAIN_SIZE, MAX_PITCH, MIN_GRAIN_SIZE, MIN_PITCH,
};
use lento_io::{read_wav_stereo, write_wav_stereo};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ShiftArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pitch factor (0.5 to 2.0)
    #[arg(long)]
    pitch: f32,

    /// Grain size in samples (512 to 4096)
    #[arg(long, default_value_t = DEFAULT_GRAIN_SIZE)]
    grain_size: usize,

    /// Grain overlap in [0, 1)
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    overlap: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ShiftArgs) -> anyhow::Result<()> {
    check_bit_depth(args.bit_depth)?;
    if !args.pitch.is_finite() {
        anyhow::bail!("pitch factor must be a finite number");
    }
    if !(MIN_GRAIN_SIZE..=MAX_GRAIN_SIZE).contains(&args.grain_size) {
        anyhow::bail!(
            "grain size must be between {MIN_GRAIN_SIZE} and {MAX_GRAIN_SIZE}, got {}",
            args.grain_size
        );
    }
    if !(0.0..1.0).contains(&args.overlap) {
        anyhow::bail!("overlap must be in [0, 1), got {}", args.overlap);
    }
    if args.block_size == 0 {
        anyhow::bail!("block size must be non-zero");
    }
    if !(MIN_PITCH..=MAX_PITCH).contains(&args.pitch) {
        tracing::warn!(pitch = args.pitch, "pitch factor clamped to [{MIN_PITCH}, {MAX_PITCH}]");
    }

    println!("Reading {}...", args.input.display());
    let (track, spec) = read_wav_stereo(&args.input)?;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        track.len(),
        spec.sample_rate,
        track.duration_seconds()
    );

    // One processor per channel keeps the stereo image
    let mut shifters = [
        GrainProcessor::new(args.grain_size, args.overlap),
        GrainProcessor::new(args.grain_size, args.overlap),
    ];
    for shifter in &mut shifters {
        shifter.set_pitch_factor(args.pitch);
    }
    let latency = shifters[0].latency_samples();

    println!(
        "Shifting by {:.3} (grain {}, hop {})...",
        shifters[0].pitch_factor(),
        shifters[0].grain_size(),
        shifters[0].hop_size()
    );
    let pb = progress_bar(2 * (track.len() + latency) as u64)?;
    let [left_shifter, right_shifter] = &mut shifters;
    let left = process_aligned(left_shifter, &track.left, latency, args.block_size, &pb);
    let right = process_aligned(right_shifter, &track.right, latency, args.block_size, &pb);
    pb.finish_and_clear();

    let shifted = StereoBuffer::new(left, right, track.sample_rate);

    println!("\nStats:");
    print_levels("Input ", &track.to_mono());
    print_levels("Output", &shifted.to_mono());

    write_wav_stereo(&args.output, &shifted, args.bit_depth)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
