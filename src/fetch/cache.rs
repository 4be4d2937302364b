//! SQLite-backed HTTP response cache
//!
//! Responses are stored under a SHA-256 digest of the request identity, so a
//! repeated run against the same URL is served from disk instead of the
//! network. Entries never expire; `clear` is the only way to drop them.

use crate::fetch::schema::initialize_schema;
use crate::fetch::Response;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

/// Computes the cache key for a request
///
/// # Arguments
///
/// * `method` - HTTP method, e.g. `GET`
/// * `url` - The requested URL
///
/// # Returns
///
/// Hex-encoded SHA-256 of the method and URL
pub fn cache_key(method: &str, url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b" ");
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Response cache stored in a single SQLite file
pub struct ResponseCache {
    conn: Connection,
}

impl ResponseCache {
    /// Opens (or creates) the cache database at `path`
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory cache (for testing)
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Looks up a cached response by key
    pub fn get(&self, key: &str) -> Result<Option<Response>, rusqlite::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT final_url, status_code, content_type, body
                 FROM responses WHERE cache_key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u16>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Vec<u8>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((final_url, status_code, content_type, body)) = row else {
            return Ok(None);
        };

        // A row whose URL no longer parses is treated as absent
        match Url::parse(&final_url) {
            Ok(url) => Ok(Some(Response {
                url,
                status_code,
                content_type,
                body,
                from_cache: true,
            })),
            Err(e) => {
                tracing::warn!("Discarding cache entry with bad URL {}: {}", final_url, e);
                Ok(None)
            }
        }
    }

    /// Stores a response under `key`, replacing any previous entry
    pub fn put(
        &self,
        key: &str,
        method: &str,
        requested: &Url,
        response: &Response,
    ) -> Result<(), rusqlite::Error> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO responses
             (cache_key, method, url, final_url, status_code, content_type, body, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                key,
                method,
                requested.as_str(),
                response.url.as_str(),
                response.status_code,
                response.content_type,
                response.body,
                now
            ],
        )?;
        Ok(())
    }

    /// Removes every cached response, returning how many were dropped
    pub fn clear(&self) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM responses", [])
    }

    /// Number of cached responses
    pub fn len(&self) -> Result<u64, rusqlite::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> Result<bool, rusqlite::Error> {
        Ok(self.len()? == 0)
    }
}
