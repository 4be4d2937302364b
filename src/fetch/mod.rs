//! Fetch layer: cached HTTP GETs with soft failure
//!
//! This module contains:
//! - The SQLite response cache and its schema
//! - The HTTP client and the session that puts the cache in front of it

mod cache;
mod schema;
mod session;

pub use cache::{cache_key, ResponseCache};
pub use session::{build_http_client, fetch_url, CachedSession, FetchResult};

use url::Url;

/// A successful HTTP response, either fresh or replayed from the cache
#[derive(Debug, Clone)]
pub struct Response {
    /// Final URL after redirects
    pub url: Url,

    pub status_code: u16,

    pub content_type: Option<String>,

    /// Raw body bytes
    pub body: Vec<u8>,

    /// True when served from the cache
    pub from_cache: bool,
}

impl Response {
    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
