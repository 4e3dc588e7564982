//! Incidence CLI - Distributional Impact of Sector Income Shocks
//!
//! This is the operational entry point for the incidence workspace.
//!
//! # Commands
//!
//! - `incidence baseline` - Report the original income distribution
//! - `incidence evaluate --sectors 7,8 --employer-size 1 --informality 1 --shock 50` -
//!   Apply a shock scenario and compare distributions
//! - `incidence sectors` - List sector and employer size codes
//! - `incidence check` - Validate the survey extract and its baseline column
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the survey adapter to
//! the shock and metrics crates and renders their results.

use clap::{Parser, Subcommand};
use incidence_metrics::ReferenceLine;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::evaluate::EvaluateArgs;
use config::IncidenceConfig;

/// Sector income shock incidence CLI
#[derive(Parser)]
#[command(name = "incidence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "incidence.toml")]
    config: String,

    /// Survey extract path, overriding the configuration
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the original income distribution
    Baseline {
        /// Reference lines to annotate (minimum-wage, poverty-line, vulnerability-line)
        #[arg(short, long, value_delimiter = ',')]
        reference_lines: Vec<ReferenceLine>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Include density and Lorenz arrays in JSON output
        #[arg(long)]
        full: bool,
    },

    /// Apply a shock scenario and compare distributions
    Evaluate(EvaluateArgs),

    /// List sector and employer size codes
    Sectors {
        /// Count members and population per sector in the survey extract
        #[arg(long)]
        with_counts: bool,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Validate the survey extract and reconcile its baseline column
    Check {
        /// Relative tolerance for the baseline column
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },
}

/// Filter from `RUST_LOG`, falling back to the configured level.
fn env_filter(log_level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = IncidenceConfig::load_with_env_and_validate(Path::new(&cli.config))?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(&config.log_level, cli.verbose))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Baseline {
            reference_lines,
            format,
            full,
        } => commands::baseline::run(&config, &reference_lines, format.as_deref(), full),
        Commands::Evaluate(args) => commands::evaluate::run(&config, &args),
        Commands::Sectors {
            with_counts,
            format,
        } => commands::sectors::run(&config, with_counts, format.as_deref()),
        Commands::Check { tolerance, format } => {
            commands::check::run(&config, tolerance, format.as_deref())
        }
    }
}
