//! Output module for rendering result sets
//!
//! This module handles:
//! - Prepending the mode's header row
//! - Printing plain lines or an aligned table to stdout
//! - Writing timestamped CSV files under the results directory

mod csv;
mod pretty;

pub use self::csv::{parse_rows, read_csv, write_csv, write_row};
pub use pretty::format_table;

use crate::config::PathConfig;
use crate::scrape::Mode;
use crate::{OutputResult, ScrapeError};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Timestamp pattern used in result file names
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// One extracted record; arity depends on the mode
pub type Row = Vec<String>;

/// Rendering selected by `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Aligned table on stdout
    Pretty,
    /// CSV file under the results directory
    File,
}

/// Rows produced by one extractor run, without the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    mode: Mode,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Wraps extractor rows, checking each has the arity of the mode's header
    pub fn new(mode: Mode, rows: Vec<Row>) -> Result<Self, ScrapeError> {
        let expected = mode.header().len();
        if let Some(bad) = rows.iter().find(|row| row.len() != expected) {
            return Err(ScrapeError::InvalidRow {
                mode: mode.name(),
                expected,
                found: bad.len(),
            });
        }
        Ok(Self { mode, rows })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row followed by every data row
    pub fn with_header(&self) -> Vec<Row> {
        let header: Row = self.mode.header().iter().map(|h| h.to_string()).collect();
        std::iter::once(header)
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

/// Renders a result set according to the selected output mode
///
/// # Returns
///
/// * `Ok(Some(PathBuf))` - The CSV file written in `file` mode
/// * `Ok(None)` - Output was printed to stdout
/// * `Err(OutputError)` - Failed to write the CSV file
pub fn control_output(
    results: &ResultSet,
    output: Option<OutputMode>,
    paths: &PathConfig,
) -> OutputResult<Option<PathBuf>> {
    let rows = results.with_header();
    match output {
        Some(OutputMode::Pretty) => {
            print!("{}", format_table(&rows));
            Ok(None)
        }
        Some(OutputMode::File) => {
            let path = file_output(&rows, results.mode(), &paths.results_dir())?;
            Ok(Some(path))
        }
        None => {
            print!("{}", format_plain(&rows));
            Ok(None)
        }
    }
}

/// One line per row, fields separated by single spaces
pub fn format_plain(rows: &[Row]) -> String {
    rows.iter().map(|row| row.join(" ") + "\n").collect()
}

/// Writes rows to `<results_dir>/<mode>_<timestamp>.csv`
pub fn file_output(rows: &[Row], mode: Mode, results_dir: &Path) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(results_dir)?;

    let file_name = format!(
        "{}_{}.csv",
        mode.name(),
        Local::now().format(DATETIME_FORMAT)
    );
    let path = results_dir.join(file_name);

    write_csv(&path, rows)?;
    tracing::info!("Results saved to {}", path.display());

    Ok(path)
}
