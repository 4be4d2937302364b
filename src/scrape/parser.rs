//! HTML helpers shared by the extractors
//!
//! Every lookup here is strict: a missing landmark means the target site has
//! changed shape, so it fails with a `ParserError` naming what was searched
//! and on which page.

use crate::fetch::CachedSession;
use crate::{ParserError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched and parsed HTML page
pub struct Page {
    /// URL the page was requested from; relative links resolve against it
    pub url: Url,
    pub document: Html,
}

impl Page {
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// The `<html>` element, the scope for document-wide searches
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Shorthand for [`find_tag`] over the whole document
    pub fn find(
        &self,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> std::result::Result<ElementRef<'_>, ParserError> {
        find_tag(self.root(), tag, attrs, &self.url)
    }
}

/// Fetches `url` through the session and parses it
///
/// # Returns
///
/// * `Ok(Some(Page))` - Page fetched and parsed
/// * `Ok(None)` - Recoverable miss (already logged by the session)
/// * `Err(ScrapeError)` - Cache failure
pub async fn fetch_page(session: &mut CachedSession, url: &Url) -> Result<Option<Page>> {
    let Some(response) = session.get(url).await? else {
        return Ok(None);
    };
    Ok(Some(Page::parse(url.clone(), &response.text())))
}

/// Builds a CSS selector for a tag name and attribute filters
///
/// A `class` filter matches every whitespace-separated token of its value;
/// any other attribute must match exactly.
pub fn build_selector(tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut selector = tag.to_string();
    for (name, value) in attrs {
        if *name == "class" {
            for class in value.split_whitespace() {
                selector.push_str(&format!("[class~=\"{}\"]", escape(class)));
            }
        } else {
            selector.push_str(&format!("[{}=\"{}\"]", name, escape(value)));
        }
    }
    selector
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_selector(tag: &str, attrs: &[(&str, &str)]) -> std::result::Result<Selector, ParserError> {
    let selector = build_selector(tag, attrs);
    let parsed = Selector::parse(&selector).ok();
    parsed.ok_or(ParserError::InvalidSelector { selector })
}

/// Formats attribute filters for error messages, e.g. ` id="numerical-index"`
fn describe_attrs(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(" {}=\"{}\"", name, value))
        .collect()
}

/// Returns the first descendant of `scope` matching `tag` and `attrs`
///
/// # Arguments
///
/// * `scope` - Element to search under
/// * `tag` - Tag name, e.g. `section`
/// * `attrs` - Attribute filters, e.g. `&[("id", "numerical-index")]`
/// * `page` - Page URL, reported in the error
///
/// # Example
///
/// ```
/// use pydocs_scraper::scrape::{find_tag, Page};
/// use url::Url;
///
/// let page = Page::parse(
///     Url::parse("https://peps.python.org/").unwrap(),
///     r#"<section id="numerical-index"><table><tbody></tbody></table></section>"#,
/// );
/// let section =
///     find_tag(page.root(), "section", &[("id", "numerical-index")], &page.url).unwrap();
/// assert!(find_tag(section, "tbody", &[], &page.url).is_ok());
/// ```
pub fn find_tag<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    attrs: &[(&str, &str)],
    page: &Url,
) -> std::result::Result<ElementRef<'a>, ParserError> {
    let selector = parse_selector(tag, attrs)?;
    scope
        .select(&selector)
        .next()
        .ok_or_else(|| ParserError::TagNotFound {
            tag: tag.to_string(),
            attrs: describe_attrs(attrs),
            page: page.to_string(),
        })
}

/// Returns every descendant of `scope` matching `tag` and `attrs`, in
/// document order
pub fn find_all<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    attrs: &[(&str, &str)],
) -> std::result::Result<Vec<ElementRef<'a>>, ParserError> {
    let selector = parse_selector(tag, attrs)?;
    Ok(scope.select(&selector).collect())
}

/// Reads a required attribute
pub fn attr<'a>(
    element: ElementRef<'a>,
    name: &str,
    page: &Url,
) -> std::result::Result<&'a str, ParserError> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| ParserError::MissingAttribute {
            tag: element.value().name().to_string(),
            attr: name.to_string(),
            page: page.to_string(),
        })
}

/// Concatenated text of an element and all its descendants
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// The next sibling element named `tag`, skipping text and other elements
pub fn next_sibling_tag<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == tag)
}
