//! pydocs-scraper main entry point
//!
//! This is the command-line interface for the Python documentation scraper.

use anyhow::Context;
use clap::Parser;
use pydocs_scraper::config::{load_config_or_default, Config};
use pydocs_scraper::output::{control_output, OutputMode};
use pydocs_scraper::scrape::{Mode, Outcome};
use pydocs_scraper::CachedSession;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// pydocs-scraper: Python documentation scraper
///
/// Collects "What's New" articles, documentation versions and PEP status
/// counts from docs.python.org and peps.python.org, or downloads the PDF
/// documentation archive.
#[derive(Parser, Debug)]
#[command(name = "pydocs-scraper")]
#[command(version)]
#[command(about = "Python documentation scraper", long_about = None)]
struct Cli {
    /// What to scrape
    #[arg(value_enum, value_name = "MODE")]
    mode: Mode,

    /// Clear the HTTP cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Output format (plain lines on stdout when omitted)
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    setup_logging(cli.verbose, cli.quiet, &config.paths.log_file())?;
    tracing::info!("Parser started");
    tracing::info!("Command line arguments: {:?}", cli);

    match run(&cli, &config).await {
        Ok(()) => {
            tracing::info!("Parser finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Parser failed: {:#}", e);
            Err(e)
        }
    }
}

/// Sets up logging to stdout and to the log file
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pydocs_scraper=info,warn"),
            1 => EnvFilter::new("pydocs_scraper=debug,info"),
            _ => EnvFilter::new("pydocs_scraper=trace,debug"),
        }
    };

    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    Ok(())
}

/// Runs the selected mode and renders its results
async fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mut session = CachedSession::new(config).context("Failed to open HTTP session")?;
    if cli.clear_cache {
        session.clear_cache()?;
    }

    let outcome = cli
        .mode
        .run(&mut session, config)
        .await
        .with_context(|| format!("Mode '{}' failed", cli.mode))?;

    match outcome {
        Outcome::Rows(results) => {
            tracing::debug!("{} rows extracted", results.len());
            control_output(&results, cli.output, &config.paths)?;
        }
        Outcome::Saved(path) => {
            tracing::debug!("Nothing to render, file saved to {}", path.display())
        }
        Outcome::Nothing => tracing::info!("No results to output"),
    }

    if !session.misses().is_empty() {
        tracing::warn!("{} pages could not be loaded", session.misses().len());
    }

    Ok(())
}
