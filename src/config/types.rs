use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for pydocs-scraper
///
/// Every section is optional; missing keys fall back to the public
/// docs.python.org and peps.python.org layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub urls: UrlConfig,
    pub paths: PathConfig,
    pub http: HttpConfig,
}

/// Target site locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Root of the versioned documentation
    #[serde(rename = "main-doc")]
    pub main_doc: String,

    /// Index of "What's New" articles
    #[serde(rename = "whats-new")]
    pub whats_new: String,

    /// PEP index
    pub pep: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            main_doc: "https://docs.python.org/3/".to_string(),
            whats_new: "https://docs.python.org/3/whatsnew/".to_string(),
            pep: "https://peps.python.org/".to_string(),
        }
    }
}

/// On-disk locations, relative paths resolved against `base_dir`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    #[serde(rename = "base-dir")]
    pub base_dir: PathBuf,

    /// Where CSV results are written
    #[serde(rename = "results-dir")]
    pub results_dir: PathBuf,

    /// Where downloaded archives are written
    #[serde(rename = "downloads-dir")]
    pub downloads_dir: PathBuf,

    #[serde(rename = "log-dir")]
    pub log_dir: PathBuf,

    /// SQLite file backing the HTTP response cache
    #[serde(rename = "cache-path")]
    pub cache_path: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            results_dir: PathBuf::from("results"),
            downloads_dir: PathBuf::from("downloads"),
            log_dir: PathBuf::from("logs"),
            cache_path: PathBuf::from("http_cache.sqlite"),
        }
    }
}

impl PathConfig {
    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join(&self.results_dir)
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join(&self.downloads_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join(&self.log_dir).join("parser.log")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache_path)
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pydocs-scraper/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}
