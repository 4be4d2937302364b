//! "What's New" articles: one row per Python release article

use crate::config::UrlConfig;
use crate::fetch::CachedSession;
use crate::output::Row;
use crate::scrape::parser::{attr, fetch_page, find_all, find_tag, text, Page};
use crate::Result;
use url::Url;

/// Collects `(article url, heading, editor/author credit)` rows
///
/// Returns `Ok(None)` when the index page itself cannot be fetched. Articles
/// that fail to load are left out.
pub async fn whats_new(session: &mut CachedSession, urls: &UrlConfig) -> Result<Option<Vec<Row>>> {
    let index_url = Url::parse(&urls.whats_new)?;
    let links = {
        let Some(index) = fetch_page(session, &index_url).await? else {
            return Ok(None);
        };
        article_links(&index)?
    };
    tracing::info!("Found {} \"What's New\" articles", links.len());

    let mut rows = Vec::with_capacity(links.len());
    for link in links {
        let Some(page) = fetch_page(session, &link).await? else {
            continue;
        };
        rows.push(article_row(&page)?);
    }

    Ok(Some(rows))
}

/// Absolute URLs of every top-level entry in the index's table of contents
pub fn article_links(index: &Page) -> Result<Vec<Url>> {
    let main_section = index.find("section", &[("id", "what-s-new-in-python")])?;
    let toctree = find_tag(
        main_section,
        "div",
        &[("class", "toctree-wrapper")],
        &index.url,
    )?;

    let mut links = Vec::new();
    for item in find_all(toctree, "li", &[("class", "toctree-l1")])? {
        let a = find_tag(item, "a", &[], &index.url)?;
        let href = attr(a, "href", &index.url)?;
        links.push(index.url.join(href)?);
    }
    Ok(links)
}

/// Heading and credit block of a single article
pub fn article_row(page: &Page) -> Result<Row> {
    let h1 = page.find("h1", &[])?;
    let dl = page.find("dl", &[])?;
    Ok(vec![
        page.url.to_string(),
        text(h1),
        text(dl).replace('\n', " "),
    ])
}
