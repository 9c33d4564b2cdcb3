//! mmswap CLI - list the manual filament swaps in a print file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mmswap::{ExtractSettings, JobRecord};
use std::fs;
use std::path::{Path, PathBuf};

mod render;

#[derive(Parser)]
#[command(name = "mmswap")]
#[command(about = "Extract manual filament swaps from G-code and 3MF files", long_about = None)]
struct Cli {
    /// TOML file overriding extraction settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full job record as JSON
    Inspect {
        /// Print file (.gcode or .3mf)
        file: PathBuf,
    },
    /// Print the palette and a numbered swap checklist
    Checklist {
        /// Print file (.gcode or .3mf)
        file: PathBuf,
    },
    /// Print swap and filament counts
    Summary {
        /// Print file (.gcode or .3mf)
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<ExtractSettings> {
    let Some(path) = path else {
        return Ok(ExtractSettings::default());
    };
    tracing::info!("Loading settings from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    ExtractSettings::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_job(file: &Path, settings: &ExtractSettings) -> Result<JobRecord> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    tracing::info!("Parsing {} ({} bytes)", name, bytes.len());

    let job = mmswap::extract_with(&name, &bytes, settings)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    tracing::info!(
        "Found {} swaps across {} filaments",
        job.summary.swap_count,
        job.summary.distinct_slots_used
    );
    Ok(job)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file } => {
            let job = load_job(&file, &settings)?;
            println!("{}", job.to_json()?);
        }
        Commands::Checklist { file } => {
            let job = load_job(&file, &settings)?;
            print!("{}", render::checklist(&job));
        }
        Commands::Summary { file } => {
            let job = load_job(&file, &settings)?;
            print!("{}", render::summary(&job));
        }
    }

    Ok(())
}
