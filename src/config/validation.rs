use crate::config::types::{Config, HttpConfig, PathConfig, UrlConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_urls(&config.urls)?;
    validate_paths(&config.paths)?;
    validate_http(&config.http)?;
    Ok(())
}

fn validate_urls(config: &UrlConfig) -> Result<(), ConfigError> {
    validate_base_url("main-doc", &config.main_doc)?;
    validate_base_url("whats-new", &config.whats_new)?;
    validate_base_url("pep", &config.pep)?;
    Ok(())
}

/// Validates a URL that relative links are resolved against
///
/// The trailing slash matters: `Url::join` drops the last path segment of a
/// base without one.
fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must end with '/'",
            key, value
        )));
    }

    Ok(())
}

fn validate_paths(config: &PathConfig) -> Result<(), ConfigError> {
    for (key, path) in [
        ("base-dir", &config.base_dir),
        ("results-dir", &config.results_dir),
        ("downloads-dir", &config.downloads_dir),
        ("log-dir", &config.log_dir),
        ("cache-path", &config.cache_path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }
    Ok(())
}

fn validate_http(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}
