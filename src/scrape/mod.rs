//! Scrape module: one extractor per mode
//!
//! This module contains:
//! - Strict HTML lookup helpers
//! - The four page extractors
//! - The expected PEP status table
//! - `Mode`, the closed set of extractors selectable from the command line

mod download;
mod latest_versions;
mod parser;
mod pep;
mod status;
mod whats_new;

pub use download::{archive_file_name, archive_link, download, save_archive};
pub use latest_versions::{latest_versions, split_version, version_rows};
pub use parser::{
    attr, build_selector, fetch_page, find_all, find_tag, next_sibling_tag, text, Page,
};
pub use pep::{index_entries, page_status, pep, status_code, IndexEntry, StatusTally, TOTAL_LABEL};
pub use status::{ExpectedStatus, Reconciliation, EXPECTED_STATUS};
pub use whats_new::{article_links, article_row, whats_new};

use crate::config::Config;
use crate::fetch::CachedSession;
use crate::output::ResultSet;
use crate::Result;
use std::path::PathBuf;

/// Which extractor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Mode {
    /// Links, titles and authors of "What's New" articles
    WhatsNew,
    /// Documentation versions and their status
    LatestVersions,
    /// Download the PDF (A4) documentation archive
    Download,
    /// Count PEPs by status
    Pep,
}

/// What a mode produced
#[derive(Debug)]
pub enum Outcome {
    /// Rows for the formatter
    Rows(ResultSet),
    /// A file written as a side effect; nothing to format
    Saved(PathBuf),
    /// Nothing fetched, nothing to format
    Nothing,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::WhatsNew, Mode::LatestVersions, Mode::Download, Mode::Pep];

    /// Name used on the command line and in result file names
    pub fn name(&self) -> &'static str {
        match self {
            Self::WhatsNew => "whats-new",
            Self::LatestVersions => "latest-versions",
            Self::Download => "download",
            Self::Pep => "pep",
        }
    }

    /// Header row the formatter prepends; empty for modes without rows
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::WhatsNew => &["Article link", "Title", "Editor, Author"],
            Self::LatestVersions => &["Documentation link", "Version", "Status"],
            Self::Download => &[],
            Self::Pep => &["Status", "Count"],
        }
    }

    /// Runs this mode's extractor against the session
    pub async fn run(self, session: &mut CachedSession, config: &Config) -> Result<Outcome> {
        let rows = match self {
            Self::WhatsNew => whats_new(session, &config.urls).await?,
            Self::LatestVersions => latest_versions(session, &config.urls).await?,
            Self::Pep => pep(session, &config.urls, &EXPECTED_STATUS).await?,
            Self::Download => {
                return Ok(match download(session, config).await? {
                    Some(path) => Outcome::Saved(path),
                    None => Outcome::Nothing,
                });
            }
        };

        match rows {
            Some(rows) => Ok(Outcome::Rows(ResultSet::new(self, rows)?)),
            None => Ok(Outcome::Nothing),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
