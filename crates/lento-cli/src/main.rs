//! lento CLI - slowed + reverb from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lento")]
#[command(author, version, about = "Slowed + reverb DSP toolkit", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a reverb impulse response
    Impulse(commands::impulse::ImpulseArgs),

    /// Pitch-shift a file with the grain processor
    Shift(commands::shift::ShiftArgs),

    /// Render a file through the whole slowed + reverb chain
    Render(commands::render::RenderArgs),

    /// Show the control values derived from settings
    Params(commands::params::ParamsArgs),

    /// List and inspect factory presets
    Presets(commands::presets::PresetsArgs),

    /// Report decay figures of an impulse response file
    Analyze(commands::analyze::AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Impulse(args) => commands::impulse::run(args),
        Commands::Shift(args) => commands::shift::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
    }
}
