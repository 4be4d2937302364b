//! Documentation versions listed in the sidebar of the main doc page

use crate::config::UrlConfig;
use crate::fetch::CachedSession;
use crate::output::Row;
use crate::scrape::parser::{attr, fetch_page, find_all, text, Page};
use crate::{ParserError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Marker identifying the version list among the sidebar lists
const VERSION_LIST_MARKER: &str = "All versions";

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("version pattern is valid")
});

/// Collects `(link, version, status)` rows from the sidebar
///
/// Returns `Ok(None)` when the main page cannot be fetched.
pub async fn latest_versions(
    session: &mut CachedSession,
    urls: &UrlConfig,
) -> Result<Option<Vec<Row>>> {
    let url = Url::parse(&urls.main_doc)?;
    let Some(page) = fetch_page(session, &url).await? else {
        return Ok(None);
    };
    version_rows(&page).map(Some)
}

/// Extracts the version rows from an already fetched main page
pub fn version_rows(page: &Page) -> Result<Vec<Row>> {
    let sidebar = page.find("div", &[("class", "sphinxsidebarwrapper")])?;

    let list = find_all(sidebar, "ul", &[])?
        .into_iter()
        .find(|ul| text(*ul).contains(VERSION_LIST_MARKER))
        .ok_or_else(|| ParserError::VersionListNotFound {
            page: page.url.to_string(),
        })?;

    let mut rows = Vec::new();
    for a in find_all(list, "a", &[])? {
        let link = attr(a, "href", &page.url)?.to_string();
        let (version, status) = split_version(&text(a));
        rows.push(vec![link, version, status]);
    }
    Ok(rows)
}

/// Splits `Python 3.12 (stable)` into `("3.12", "stable")`
///
/// Text that does not follow the pattern becomes the version, with an empty
/// status.
pub fn split_version(link_text: &str) -> (String, String) {
    match VERSION_PATTERN.captures(link_text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (link_text.to_string(), String::new()),
    }
}
