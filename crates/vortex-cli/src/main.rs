//! Vortex CLI - Command-line interface for the Vortex particle engine

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{presets, simulate, text};

#[derive(Parser)]
#[command(name = "vortex")]
#[command(about = "Headless driver for Vortex particle effects", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    Presets,

    /// Print a preset's configuration
    Show {
        /// Preset name
        preset: String,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Run an effect headlessly and report what it did
    Simulate {
        /// Preset name or path to a TOML configuration
        source: String,

        /// Number of frames to step
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Seed for the particle generator
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Burst once before the first frame
        #[arg(long)]
        burst: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Spell out text in staggered firework explosions
    Text {
        /// Text to explode, one burst per character
        text: String,

        /// Number of frames to step
        #[arg(long, default_value = "180")]
        frames: u32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Seed for the particle generator
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Horizontal distance between letters, unit space
        #[arg(long, default_value = "0.08")]
        spacing: f64,

        /// Seconds between letters
        #[arg(long, default_value = "0.15")]
        delay: f64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Presets => presets::list(),
        Commands::Show { preset, format } => presets::show(&preset, &format),
        Commands::Simulate {
            source,
            frames,
            fps,
            seed,
            burst,
            format,
        } => simulate::run(simulate::SimulateArgs {
            source,
            frames,
            fps,
            seed,
            burst,
            format,
        }),
        Commands::Text {
            text,
            frames,
            fps,
            seed,
            spacing,
            delay,
            format,
        } => text::run(text::TextArgs {
            text,
            frames,
            fps,
            seed,
            spacing,
            delay,
            format,
        }),
    }
}
