mod commands;
mod io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hdrp", about = "HDR+ style burst alignment tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a burst of grayscale frames to a reference
    Align(commands::align::AlignArgs),
    /// Tone map a single image
    Finish(commands::finish::FinishArgs),
    /// Print or save a default config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Align(args) => commands::align::run(args),
        Commands::Finish(args) => commands::finish::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
