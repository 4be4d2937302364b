//! Configuration module for pydocs-scraper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file the scraper targets the public Python
//! documentation and writes under the current directory.
//!
//! # Example
//!
//! ```no_run
//! use pydocs_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Results go to: {}", config.paths.results_dir().display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, PathConfig, UrlConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
