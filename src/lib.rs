//! pydocs-scraper: a batch scraper for the Python documentation site
//!
//! This crate fetches a bounded set of pages from docs.python.org and the PEP
//! index, extracts tabular data from their fixed HTML structure, and renders
//! the results to the console or to CSV files.

pub mod config;
pub mod fetch;
pub mod output;
pub mod scrape;

use thiserror::Error;

/// Main error type for scraper operations
///
/// Every variant is fatal for the current run. Recoverable page misses never
/// surface here; the fetch layer reports them as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("HTTP cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row has {found} fields, expected {expected} for mode {mode}")]
    InvalidRow {
        mode: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Structural HTML errors: the target page no longer looks the way the
/// extractors assume
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Tag not found: <{tag}{attrs}> on page {page}")]
    TagNotFound {
        tag: String,
        attrs: String,
        page: String,
    },

    #[error("Attribute '{attr}' missing on <{tag}> on page {page}")]
    MissingAttribute {
        tag: String,
        attr: String,
        page: String,
    },

    #[error("Field '{field}' not found in metadata on page {page}")]
    MissingField { field: String, page: String },

    #[error("List of Python versions not found on page {page}")]
    VersionListNotFound { page: String },

    #[error("Invalid selector '{selector}'")]
    InvalidSelector { selector: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while rendering results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;

// Re-export commonly used types
pub use config::Config;
pub use fetch::CachedSession;
pub use output::{OutputMode, ResultSet, Row};
pub use scrape::{Mode, Outcome};
