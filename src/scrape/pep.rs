//! PEP status counts from the numerical index and each PEP's own page

use crate::config::UrlConfig;
use crate::fetch::CachedSession;
use crate::output::Row;
use crate::scrape::parser::{attr, fetch_page, find_all, find_tag, next_sibling_tag, text, Page};
use crate::scrape::status::{ExpectedStatus, Reconciliation};
use crate::{ParserError, Result};
use url::Url;

/// Label of the final row
pub const TOTAL_LABEL: &str = "Total:";

/// How often progress is logged while scanning PEPs
const PROGRESS_EVERY: usize = 50;

/// One row of the numerical index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Status code from the first cell, marker character dropped
    pub code: String,
    /// Absolute URL of the PEP page
    pub url: Url,
}

/// Running count per status, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    counts: Vec<(String, usize)>,
}

impl StatusTally {
    pub fn add(&mut self, status: &str) {
        match self.counts.iter_mut().find(|(s, _)| s.as_str() == status) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((status.to_string(), 1)),
        }
    }

    pub fn get(&self, status: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(s, _)| s.as_str() == status)
            .map(|(_, count)| *count)
    }

    /// Sum of all counts; can be below the number of scanned rows
    pub fn counted(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// `(status, count)` rows followed by the total-scanned row
    pub fn into_rows(self, scanned: usize) -> Vec<Row> {
        self.counts
            .into_iter()
            .map(|(status, count)| vec![status, count.to_string()])
            .chain(std::iter::once(vec![
                TOTAL_LABEL.to_string(),
                scanned.to_string(),
            ]))
            .collect()
    }
}

/// Counts PEPs by the status on their own page
///
/// Returns `Ok(None)` when the index cannot be fetched. A PEP whose page
/// fails to load still counts toward the total row.
pub async fn pep(
    session: &mut CachedSession,
    urls: &UrlConfig,
    expected: &ExpectedStatus,
) -> Result<Option<Vec<Row>>> {
    let index_url = Url::parse(&urls.pep)?;
    let entries = {
        let Some(index) = fetch_page(session, &index_url).await? else {
            return Ok(None);
        };
        index_entries(&index)?
    };
    tracing::info!("Scanning {} PEPs", entries.len());

    let mut tally = StatusTally::default();
    let mut scanned = 0;

    for entry in &entries {
        scanned += 1;
        if scanned % PROGRESS_EVERY == 0 {
            tracing::info!("Progress: {} / {} PEPs", scanned, entries.len());
        }

        let Some(page) = fetch_page(session, &entry.url).await? else {
            continue;
        };
        let status = page_status(&page)?;

        let reconciliation = expected.reconcile(&entry.code, &status);
        match reconciliation {
            Reconciliation::Expected => {}
            Reconciliation::Mismatch { expected: wanted } => {
                tracing::info!(
                    "Mismatched status: {} status on page: {} expected: {:?}",
                    entry.url,
                    status,
                    wanted
                );
            }
            Reconciliation::Invalid => {
                tracing::warn!(
                    "Invalid status received: {} code '{}' status '{}'",
                    entry.url,
                    entry.code,
                    status
                );
            }
        }
        if reconciliation.is_counted() {
            tally.add(&status);
        }
    }

    tracing::debug!("{} of {} PEPs tallied", tally.counted(), scanned);
    Ok(Some(tally.into_rows(scanned)))
}

/// Reads every row of the numerical index table
pub fn index_entries(index: &Page) -> Result<Vec<IndexEntry>> {
    let section = index.find("section", &[("id", "numerical-index")])?;
    let tbody = find_tag(section, "tbody", &[], &index.url)?;

    let mut entries = Vec::new();
    for tr in find_all(tbody, "tr", &[])? {
        let td = find_tag(tr, "td", &[], &index.url)?;
        let code = status_code(&text(td));

        let a = find_tag(tr, "a", &[], &index.url)?;
        let url = index.url.join(attr(a, "href", &index.url)?)?;

        entries.push(IndexEntry { code, url });
    }
    Ok(entries)
}

/// Status code from the index cell: type marker first, then the code
///
/// `"SF"` gives `"F"`, `"P 0"` gives `"0"`; a lone `"I"` gives the empty code.
pub fn status_code(cell: &str) -> String {
    let code: String = cell.trim().chars().skip(1).collect();
    code.trim().to_string()
}

/// Status value from the metadata list of a PEP page
pub fn page_status(page: &Page) -> Result<String> {
    let dl = page.find("dl", &[("class", "rfc2822 field-list")])?;

    let dt = find_all(dl, "dt", &[])?
        .into_iter()
        .find(|dt| text(*dt).trim_start().starts_with("Status"))
        .ok_or_else(|| ParserError::MissingField {
            field: "Status".to_string(),
            page: page.url.to_string(),
        })?;

    let dd = next_sibling_tag(dt, "dd").ok_or_else(|| ParserError::TagNotFound {
        tag: "dd".to_string(),
        attrs: " after Status".to_string(),
        page: page.url.to_string(),
    })?;

    Ok(text(dd).trim().to_string())
}
