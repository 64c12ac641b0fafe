//! Show the chain values derived from settings.

use crate::commands::common::ControlArgs;
use clap::Args;
use lento_config::format_speed_display;
use lento_effects::{IrAlgorithm, hall_feedback_coefficient};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    controls: ControlArgs,

    /// Sample rate used for the reverb figures
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ParamsReport {
    speed: String,
    rate: f32,
    wet: f32,
    dry: f32,
    shelf_gain_db: f32,
    pitch_factor: f32,
    bypass: bool,
    active_preset: Option<String>,
    algorithm: &'static str,
    duration_seconds: f32,
    decay_rate: f32,
    impulse_samples: usize,
    hall_feedback: Option<f32>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if args.sample_rate == 0 {
        anyhow::bail!("sample rate must be non-zero");
    }
    let settings = args.controls.resolve()?;
    let values = settings.control_values();
    let synth = settings.to_synth();
    let params = synth.params();

    let report = ParamsReport {
        speed: format_speed_display(settings.speed),
        rate: values.rate,
        wet: values.wet,
        dry: values.dry,
        shelf_gain_db: values.shelf_gain_db,
        pitch_factor: values.pitch_factor,
        bypass: values.bypass,
        active_preset: settings.active_preset.clone(),
        algorithm: synth.algorithm().name(),
        duration_seconds: params.duration_seconds,
        decay_rate: params.decay_rate,
        impulse_samples: synth.output_len(args.sample_rate),
        hall_feedback: (synth.algorithm() == IrAlgorithm::Hall)
            .then(|| hall_feedback_coefficient(params.duration_seconds, args.sample_rate)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Controls");
    println!("  Speed:          {}", report.speed);
    println!("  Preset:         {}", report.active_preset.as_deref().unwrap_or("-"));
    println!("  Bypass:         {}", report.bypass);
    println!("Chain");
    println!("  Playback rate:  {:.3}", report.rate);
    println!("  Pitch factor:   {:.4}", report.pitch_factor);
    println!("  Bass shelf:     {:.2} dB", report.shelf_gain_db);
    println!("  Wet / dry:      {:.3} / {:.3}", report.wet, report.dry);
    println!("Reverb");
    println!("  Algorithm:      {}", report.algorithm);
    println!("  Duration:       {:.2}s", report.duration_seconds);
    if let Some(feedback) = report.hall_feedback {
        println!("  Decay rate:     {:.2}", report.decay_rate);
        println!("  RT60 feedback:  {feedback:.6}");
    }
    println!(
        "  Kernel:         {} samples at {} Hz",
        report.impulse_samples, args.sample_rate
    );
    Ok(())
}
