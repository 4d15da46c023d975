mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spectag", about = "Particle-scattering recording tagging tool")]
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
    /// Show recording container metadata
    Info(commands::info::InfoArgs),
    /// Classify an import batch by filename convention
    Import(commands::import::ImportArgs),
    /// Detect diffraction-order spots in a calibration recording
    Detect(commands::detect::DetectArgs),
    /// Derive the pixel/wavelength calibration from a calibration recording
    Calibrate(commands::calibrate::CalibrateArgs),
    /// Resample the ROI cube and report region statistics
    Extract(commands::extract::ExtractArgs),
    /// Assemble and write a descriptor export record
    Export(commands::export::ExportArgs),
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
        Commands::Import(args) => commands::import::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Export(args) => commands::export::run(args),
    }
}
