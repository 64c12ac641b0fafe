//! Helpers shared by several commands.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lento_config::{Algorithm, BassProfile, Settings};
use lento_core::{BlockProcessor, linear_to_db};
use std::path::PathBuf;

/// Where settings come from and which fields to override.
#[derive(Args, Debug, Default)]
pub struct ControlArgs {
    /// Settings file (TOML) to start from
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Factory preset to apply on top of the settings
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Playback speed (0.5 to 1.5)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Reverb amount in percent
    #[arg(long)]
    pub reverb: Option<f32>,

    /// Bass boost in percent
    #[arg(long)]
    pub bass: Option<f32>,

    /// Bass profile: standard (6 dB) or enhanced (12 dB)
    #[arg(long, value_parser = parse_profile)]
    pub profile: Option<BassProfile>,

    /// Undo the pitch change caused by the speed change
    #[arg(long)]
    pub pitch_correction: bool,

    /// Reverb algorithm: hall or noise
    #[arg(long, value_parser = parse_algorithm)]
    pub algorithm: Option<Algorithm>,
}

impl ControlArgs {
    /// Resolve the final settings, clamped into range.
    ///
    /// Without a settings file processing starts enabled, so overrides alone
    /// are enough to hear something.
    pub fn resolve(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings {
                enabled: true,
                ..Settings::default()
            },
        };

        if let Some(name) = &self.preset {
            settings.apply_preset(name)?;
        }
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if let Some(reverb) = self.reverb {
            settings.reverb = reverb;
        }
        if let Some(bass) = self.bass {
            settings.bass_boost = bass;
        }
        if let Some(profile) = self.profile {
            settings.bass_profile = profile;
        }
        if self.pitch_correction {
            settings.pitch_correction = true;
        }
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }

        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "clamping settings into range");
        }
        Ok(settings.sanitized())
    }
}

/// Parse `hall` or `noise`.
pub fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    match s.to_lowercase().as_str() {
        "hall" => Ok(Algorithm::Hall),
        "noise" => Ok(Algorithm::Noise),
        _ => Err(format!("unknown algorithm '{s}' (expected hall or noise)")),
    }
}

/// Parse `standard` or `enhanced`.
pub fn parse_profile(s: &str) -> Result<BassProfile, String> {
    BassProfile::from_name(&s.to_lowercase())
        .ok_or_else(|| format!("unknown bass profile '{s}' (expected standard or enhanced)"))
}

/// Reject bit depths the writer cannot produce before doing any work.
pub fn check_bit_depth(bit_depth: u16) -> anyhow::Result<()> {
    if !matches!(bit_depth, 16 | 24 | 32) {
        anyhow::bail!("bit depth must be 16, 24 or 32, got {bit_depth}");
    }
    Ok(())
}

/// Progress bar counting samples.
pub fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Run `processor` over `samples` block by block and drop the first
/// `latency` output samples, so the result lines up with the input.
pub fn process_aligned<P: BlockProcessor>(
    processor: &mut P,
    samples: &[f32],
    latency: usize,
    block_size: usize,
    progress: &ProgressBar,
) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(samples.len() + latency);
    buffer.extend_from_slice(samples);
    buffer.resize(samples.len() + latency, 0.0);

    for block in buffer.chunks_mut(block_size) {
        processor.process_block_inplace(block);
        progress.inc(block.len() as u64);
    }

    buffer.drain(..latency);
    buffer
}

/// Print RMS and peak of `samples` in dBFS.
pub fn print_levels(label: &str, samples: &[f32]) {
    println!(
        "  {label}: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(lento_analysis::rms(samples)),
        linear_to_db(lento_analysis::peak(samples))
    );
}
