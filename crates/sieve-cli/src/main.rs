mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sieve", about = "Classify video frames as clean or noisy")]
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
    /// Show video metadata
    Info(commands::info::InfoArgs),
    /// Detect noise in a single image
    Detect(commands::detect::DetectArgs),
    /// Classify every frame of a video as clean or noisy
    Classify(commands::classify::ClassifyArgs),
    /// Print or save the default classifier configuration as TOML
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
        Commands::Info(args) => commands::info::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
