//! Impulse response analysis command.

use clap::Args;
use lento_analysis::fft::{Fft, magnitude_db};
use lento_analysis::{energy_decay_curve, estimate_rt60, peak};
use lento_core::linear_to_db;
use lento_io::read_wav_stereo;
use serde::Serialize;
use std::path::PathBuf;

/// Octave band centres reported by `--bands`.
const OCTAVE_CENTRES_HZ: [f32; 8] = [63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0];

/// Largest FFT used for band levels.
const MAX_FFT_SIZE: usize = 1 << 17;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Impulse response WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Also report octave band levels
    #[arg(long)]
    bands: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ChannelReport {
    channel: &'static str,
    peak_db: f32,
    rt60_seconds: Option<f32>,
    t20_seconds: Option<f32>,
    t30_seconds: Option<f32>,
    edt_seconds: Option<f32>,
    /// EDC level at each whole second.
    edc_db_per_second: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    band_peak_db: Vec<(f32, f32)>,
}

#[derive(Serialize)]
struct Report {
    sample_rate: u32,
    samples: usize,
    duration_seconds: f32,
    channels: Vec<ChannelReport>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (ir, spec) = read_wav_stereo(&args.input)?;
    if ir.is_empty() || spec.sample_rate == 0 {
        anyhow::bail!("{} contains no audio", args.input.display());
    }
    let sample_rate = spec.sample_rate as f32;

    let channels = [("left", &ir.left), ("right", &ir.right)]
        .into_iter()
        .map(|(name, samples)| channel_report(name, samples, spec.sample_rate, args.bands))
        .collect();
    let report = Report {
        sample_rate: spec.sample_rate,
        samples: ir.len(),
        duration_seconds: ir.len() as f32 / sample_rate,
        channels,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {} samples, {} Hz, {:.2}s",
        args.input.display(),
        report.samples,
        report.sample_rate,
        report.duration_seconds
    );
    for ch in &report.channels {
        println!("\n{}", ch.channel);
        println!("  Peak:  {:.1} dB", ch.peak_db);
        match (ch.rt60_seconds, ch.t20_seconds, ch.t30_seconds, ch.edt_seconds) {
            (Some(rt60), Some(t20), t30, Some(edt)) => {
                println!("  RT60:  {rt60:.2}s");
                println!("  T20:   {t20:.2}s");
                if let Some(t30) = t30.filter(|t| *t > 0.0) {
                    println!("  T30:   {t30:.2}s");
                }
                println!("  EDT:   {edt:.2}s");
            }
            _ => println!("  RT60:  n/a (less than 25 dB of decay)"),
        }
        let edc: Vec<String> = ch
            .edc_db_per_second
            .iter()
            .enumerate()
            .map(|(s, db)| format!("{s}s {db:.1}"))
            .collect();
        println!("  EDC:   {}", edc.join(", "));
        if !ch.band_peak_db.is_empty() {
            println!("  Bands:");
            for (centre, db) in &ch.band_peak_db {
                println!("    {centre:>6.0} Hz  {db:>6.1} dB");
            }
        }
    }
    Ok(())
}

fn channel_report(
    channel: &'static str,
    samples: &[f32],
    sample_rate: u32,
    bands: bool,
) -> ChannelReport {
    let rt = estimate_rt60(samples, sample_rate as f32);
    let edc = energy_decay_curve(samples);
    let edc_db_per_second = edc.iter().step_by(sample_rate as usize).copied().collect();

    ChannelReport {
        channel,
        peak_db: linear_to_db(peak(samples)),
        rt60_seconds: rt.map(|r| r.rt60_seconds),
        t20_seconds: rt.map(|r| r.t20_seconds),
        t30_seconds: rt.map(|r| r.t30_seconds),
        edt_seconds: rt.map(|r| r.edt_seconds),
        edc_db_per_second,
        band_peak_db: if bands {
            band_levels(samples, sample_rate)
        } else {
            Vec::new()
        },
    }
}

/// Peak spectral level within each octave band.
fn band_levels(samples: &[f32], sample_rate: u32) -> Vec<(f32, f32)> {
    let size = samples.len().next_power_of_two().min(MAX_FFT_SIZE);
    let fft = Fft::new(size);
    let db = magnitude_db(&fft.forward_real(samples)[..size / 2]);
    let bin_hz = sample_rate as f32 / size as f32;

    OCTAVE_CENTRES_HZ
        .iter()
        .filter(|centre| **centre * 1.414 < sample_rate as f32 / 2.0)
        .map(|&centre| {
            let lo = ((centre / 1.414) / bin_hz) as usize;
            let hi = (((centre * 1.414) / bin_hz) as usize).clamp(lo + 1, db.len());
            let level = db[lo.min(hi - 1)..hi]
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            (centre, level)
        })
        .collect()
}
