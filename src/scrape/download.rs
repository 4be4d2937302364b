//! PDF (A4) documentation archive download

use crate::config::Config;
use crate::fetch::CachedSession;
use crate::scrape::parser::{fetch_page, find_all, find_tag, Page};
use crate::{ParserError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

static ARCHIVE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+pdf-a4\.zip$").expect("archive pattern is valid"));

/// Used when a resolved archive URL ends in `/`
const FALLBACK_FILE_NAME: &str = "python-docs-pdf-a4.zip";

/// Downloads the A4 PDF archive linked from the downloads page
///
/// # Returns
///
/// * `Ok(Some(PathBuf))` - Where the archive was written
/// * `Ok(None)` - The downloads page or the archive could not be fetched
/// * `Err(ScrapeError)` - The page has no archive link, or writing failed
pub async fn download(session: &mut CachedSession, config: &Config) -> Result<Option<PathBuf>> {
    let downloads_url = Url::parse(&config.urls.main_doc)?.join("download.html")?;
    let archive_url = {
        let Some(page) = fetch_page(session, &downloads_url).await? else {
            return Ok(None);
        };
        archive_link(&page)?
    };
    tracing::debug!("Archive link: {}", archive_url);

    let Some(response) = session.get(&archive_url).await? else {
        return Ok(None);
    };

    let path = save_archive(&config.paths.downloads_dir(), &archive_url, &response.body)?;
    tracing::info!("Archive downloaded and saved to {}", path.display());
    Ok(Some(path))
}

/// Absolute URL of the first `...pdf-a4.zip` link in the downloads table
pub fn archive_link(page: &Page) -> Result<Url> {
    let main = page.find("div", &[("role", "main")])?;
    let table = find_tag(main, "table", &[("class", "docutils")], &page.url)?;

    let href = find_all(table, "a", &[])?
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .find(|href| ARCHIVE_PATTERN.is_match(href))
        .ok_or_else(|| ParserError::TagNotFound {
            tag: "a".to_string(),
            attrs: format!(" href=/{}/", ARCHIVE_PATTERN.as_str()),
            page: page.url.to_string(),
        })?;

    Ok(page.url.join(href)?)
}

/// File name taken from the last path segment of the URL
pub fn archive_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}

/// Writes the archive bytes into `dir`, creating it if needed
pub fn save_archive(dir: &Path, url: &Url, body: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(archive_file_name(url));
    std::fs::write(&path, body)?;
    Ok(path)
}
