//! HTTP fetcher with a response cache in front of it
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Serving repeated requests from the SQLite cache
//! - Classifying failures into recoverable misses

use crate::config::{Config, HttpConfig};
use crate::fetch::cache::{cache_key, ResponseCache};
use crate::fetch::Response;
use crate::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a network fetch, before caching
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success(Response),

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single GET against the network
///
/// Never returns an error: every failure is classified into a `FetchResult`
/// variant so the caller decides whether to skip the page.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match response.bytes().await {
        Ok(body) => FetchResult::Success(Response {
            url: final_url,
            status_code: status.as_u16(),
            content_type,
            body: body.to_vec(),
            from_cache: false,
        }),
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

/// HTTP session shared by every extractor in a run
pub struct CachedSession {
    client: Client,
    cache: ResponseCache,
    misses: Vec<Url>,
}

impl CachedSession {
    /// Opens the on-disk cache named by the configuration and builds the
    /// HTTP client
    pub fn new(config: &Config) -> Result<Self> {
        let cache_path = config.paths.cache_path();
        if let Some(parent) = cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let client = build_http_client(&config.http)?;
        let cache = ResponseCache::open(&cache_path)?;
        tracing::debug!("HTTP cache opened at {}", cache_path.display());

        Ok(Self::with_parts(client, cache))
    }

    pub fn with_parts(client: Client, cache: ResponseCache) -> Self {
        Self {
            client,
            cache,
            misses: Vec::new(),
        }
    }

    /// Drops every cached response
    pub fn clear_cache(&mut self) -> Result<usize> {
        let removed = self.cache.clear()?;
        tracing::info!("HTTP cache cleared ({} entries removed)", removed);
        Ok(removed)
    }

    /// Issues a GET, serving it from the cache when possible
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Response))` - The page, from cache or network
    /// * `Ok(None)` - Recoverable miss, already logged; skip this page
    /// * `Err(ScrapeError)` - The cache itself failed
    pub async fn get(&mut self, url: &Url) -> Result<Option<Response>> {
        let key = cache_key("GET", url);

        if let Some(hit) = self.cache.get(&key)? {
            tracing::debug!("Cache hit: {}", url);
            return Ok(Some(hit));
        }

        tracing::debug!("Fetching: {}", url);
        match fetch_url(&self.client, url).await {
            FetchResult::Success(response) => {
                self.cache.put(&key, "GET", url, &response)?;
                Ok(Some(response))
            }
            FetchResult::HttpError { status_code } => {
                tracing::error!("Failed to load page {}: HTTP {}", url, status_code);
                self.misses.push(url.clone());
                Ok(None)
            }
            FetchResult::NetworkError { error } => {
                tracing::error!("Failed to load page {}: {}", url, error);
                self.misses.push(url.clone());
                Ok(None)
            }
        }
    }

    /// URLs that could not be fetched during this session, in request order
    pub fn misses(&self) -> &[Url] {
        &self.misses
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
