use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transient_analyzer::{
    config::Config,
    output::confirmation_message,
    TransientAnalyzer,
};

#[derive(Parser)]
#[command(
    name = "analyze",
    version,
    about = "Detect onsets in an audio file",
    long_about = "Detects onsets (transients) in an audio file and writes their sample offsets (at 48 kHz unless configured otherwise) to <prefix>.ana and <prefix>.json. The prefix defaults to the input path without its extension."
)]
struct Cli {
    /// Audio file to analyze (WAV, MP3, FLAC, OGG, ...)
    input: PathBuf,

    /// Output path prefix; `.ana` and `.json` are appended
    output_prefix: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting transient analyzer v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    let analyzer = TransientAnalyzer::new(config);
    let paths = analyzer
        .run(&cli.input, cli.output_prefix.as_deref())
        .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    println!("{}", confirmation_message(&paths));
    Ok(())
}
