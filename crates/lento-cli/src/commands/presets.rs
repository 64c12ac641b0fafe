//! Factory preset commands.

use clap::{Args, Subcommand};
use lento_config::{
    Preset, Settings, factory_preset_names, format_speed_display, get_factory_preset,
};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: Option<PresetsCommand>,
}

#[derive(Subcommand, Debug)]
enum PresetsCommand {
    /// List factory presets
    List,

    /// Show details of a preset
    Show {
        /// Preset identifier or display name
        name: String,

        /// Print the preset as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Write a preset out as a settings file for `render --settings`
    Export {
        /// Preset identifier or display name
        name: String,

        /// Settings file to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(PresetsCommand::List) {
        PresetsCommand::List => list(),
        PresetsCommand::Show { name, toml } => show(&name, toml),
        PresetsCommand::Export { name, output } => export(&name, &output),
    }
}

fn find(name: &str) -> anyhow::Result<Preset> {
    get_factory_preset(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown preset '{name}' (available: {})",
            factory_preset_names().join(", ")
        )
    })
}

fn list() -> anyhow::Result<()> {
    println!("Factory presets:\n");
    println!("  {:<15} {:<18} {:>6} {:>7} {:>5}", "ID", "NAME", "SPEED", "REVERB", "BASS");
    for id in factory_preset_names() {
        let preset = find(id)?;
        println!(
            "  {:<15} {:<18} {:>6} {:>6.0}% {:>4.0}%",
            id,
            preset.name,
            format_speed_display(preset.speed),
            preset.reverb,
            preset.bass_boost
        );
    }
    Ok(())
}

fn show(name: &str, as_toml: bool) -> anyhow::Result<()> {
    let preset = find(name)?;
    if as_toml {
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    let mut settings = Settings::default();
    settings.apply_preset(name)?;
    let values = settings.control_values();

    println!("{}", preset.name);
    if let Some(description) = &preset.description {
        println!("  {description}");
    }
    println!();
    println!("  Enabled:     {}", preset.enabled);
    println!("  Speed:       {}", format_speed_display(preset.speed));
    println!("  Reverb:      {:.0}% (wet {:.2}, dry {:.2})", preset.reverb, values.wet, values.dry);
    println!(
        "  Bass boost:  {:.0}% ({:.1} dB)",
        preset.bass_boost, values.shelf_gain_db
    );
    if let Some(pitch_correction) = preset.pitch_correction {
        println!("  Pitch corr.: {pitch_correction}");
    }
    if let Some(params) = preset.reverb_params {
        println!(
            "  Tail:        {:.1}s, decay {:.2}",
            params.duration_seconds, params.decay_rate
        );
    }
    Ok(())
}

fn export(name: &str, output: &Path) -> anyhow::Result<()> {
    let mut settings = Settings::default();
    settings.apply_preset(name)?;
    settings.save(output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
