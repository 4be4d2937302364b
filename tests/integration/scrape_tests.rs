//! Integration tests for the extractors
//!
//! These tests use wiremock to serve fixed HTML fixtures and run each mode
//! end-to-end through the cached session.

use pydocs_scraper::config::{Config, UrlConfig};
use pydocs_scraper::output::{control_output, read_csv, OutputMode, Row};
use pydocs_scraper::scrape::{Mode, Outcome};
use pydocs_scraper::{CachedSession, ParserError, ScrapeError};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens on port 1; requests to it fail with a connection error
const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Creates a test configuration pointing every URL at the mock server and
/// every path into `dir`
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.urls = UrlConfig {
        main_doc: format!("{}/3/", base_url),
        whats_new: format!("{}/3/whatsnew/", base_url),
        pep: format!("{}/peps/", base_url),
    };
    config.paths.base_dir = dir.to_path_buf();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn expect_rows(outcome: Outcome) -> Vec<Row> {
    match outcome {
        Outcome::Rows(results) => {
            let arity = results.mode().header().len();
            for row in results.rows() {
                assert_eq!(row.len(), arity, "row {:?} does not match header", row);
            }
            results.rows().to_vec()
        }
        other => panic!("expected rows, got {:?}", other),
    }
}

fn article(version: &str) -> String {
    format!(
        r#"<html><body><section>
        <h1>What's New In Python {version}</h1>
        <dl class="field-list simple">
        <dt class="field-odd">Editor</dt>
        <dd class="field-odd">Test Editor</dd>
        </dl>
        </section></body></html>"#
    )
}

fn sidebar(lists: &str) -> String {
    format!(
        r#"<html><body>
        <div class="sphinxsidebar"><div class="sphinxsidebarwrapper">{lists}</div></div>
        </body></html>"#
    )
}

fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body><section id="pep-content">
        <dl class="rfc2822 field-list simple">
        <dt class="field-odd">Author<span class="colon">:</span></dt>
        <dd class="field-odd">Someone</dd>
        <dt class="field-even">Status<span class="colon">:</span></dt>
        <dd class="field-even"><abbr title="">{status}</abbr></dd>
        </dl>
        </section></body></html>"#
    )
}

#[tokio::test]
async fn test_whats_new_skips_unreachable_article() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    let unreachable_article = format!("{}/3/whatsnew/3.11.html", UNREACHABLE);
    mount_html(
        &mock_server,
        "/3/whatsnew/",
        &format!(
            r#"<html><body><section id="what-s-new-in-python">
            <div class="toctree-wrapper compound"><ul>
              <li class="toctree-l1"><a href="3.13.html">3.13</a></li>
              <li class="toctree-l1"><a href="{unreachable_article}">3.11</a></li>
              <li class="toctree-l1"><a href="3.12.html">3.12</a></li>
            </ul></div>
            </section></body></html>"#
        ),
    )
    .await;
    mount_html(&mock_server, "/3/whatsnew/3.13.html", &article("3.13")).await;
    mount_html(&mock_server, "/3/whatsnew/3.12.html", &article("3.12")).await;

    let logs = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut session = CachedSession::new(&config).unwrap();
    let rows = expect_rows(Mode::WhatsNew.run(&mut session, &config).await.unwrap());

    let logged = logs.contents();
    let miss_line = logged
        .lines()
        .find(|line| line.contains("ERROR") && line.contains(&unreachable_article))
        .unwrap_or_else(|| panic!("no error entry for the unreachable article in:\n{logged}"));
    assert!(miss_line.contains("Failed to load page"));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], format!("{}/3/whatsnew/3.13.html", mock_server.uri()));
    assert_eq!(rows[0][1], "What's New In Python 3.13");
    let credit: Vec<&str> = rows[0][2].split_whitespace().collect();
    assert_eq!(credit, vec!["Editor", "Test", "Editor"]);
    assert!(!rows[0][2].contains('\n'));
    assert!(rows[1][1].ends_with("3.12"));

    assert_eq!(session.misses().len(), 1);
    assert_eq!(session.misses()[0].as_str(), unreachable_article);
}

#[tokio::test]
async fn test_latest_versions_rows() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_html(
        &mock_server,
        "/3/",
        &sidebar(
            r#"<h3>Navigation</h3>
            <ul><li><a href="genindex.html">Index</a></li></ul>
            <ul>
              <li><a href="https://docs.python.org/3.11/">Python 3.11 (security-fixes)</a></li>
              <li><a href="https://docs.python.org/3.10/">Python 3.10 (stable)</a></li>
              <li><a href="https://docs.python.org/3.14/">In development</a></li>
              <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
            </ul>"#,
        ),
    )
    .await;

    let mut session = CachedSession::new(&config).unwrap();
    let rows = expect_rows(Mode::LatestVersions.run(&mut session, &config).await.unwrap());

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], vec!["https://docs.python.org/3.11/", "3.11", "security-fixes"]);
    assert_eq!(rows[1], vec!["https://docs.python.org/3.10/", "3.10", "stable"]);
    assert_eq!(rows[2], vec!["https://docs.python.org/3.14/", "In development", ""]);
}

#[tokio::test]
async fn test_latest_versions_without_version_list_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_html(
        &mock_server,
        "/3/",
        &sidebar(r#"<ul><li><a href="genindex.html">Index</a></li></ul>"#),
    )
    .await;

    let mut session = CachedSession::new(&config).unwrap();
    let result = Mode::LatestVersions.run(&mut session, &config).await;

    assert!(matches!(
        result,
        Err(ScrapeError::Parser(ParserError::VersionListNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_missing_index_produces_nothing() {
    // Unmatched requests get a 404 from wiremock
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    let mut session = CachedSession::new(&config).unwrap();

    for mode in Mode::ALL {
        let outcome = mode.run(&mut session, &config).await.unwrap();
        assert!(matches!(outcome, Outcome::Nothing), "{} produced output", mode);
    }
    assert_eq!(session.misses().len(), Mode::ALL.len());
}

#[tokio::test]
async fn test_download_writes_single_archive() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_html(
        &mock_server,
        "/3/download.html",
        r#"<html><body><div class="body" role="main">
        <table class="docutils align-default">
          <tr><th>Format</th><th>Packed as .zip</th><th>Packed as .tar.bz2</th></tr>
          <tr><td>PDF (A4 paper size)</td>
              <td><a href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td>
              <td><a href="archives/python-3.13-docs-pdf-a4.tar.bz2">Download</a></td></tr>
          <tr><td>HTML</td>
              <td><a href="archives/python-3.13-docs-html.zip">Download</a></td></tr>
        </table>
        </div></body></html>"#,
    )
    .await;

    let archive: Vec<u8> = b"PK\x03\x04 fake archive \x00\xff bytes".to_vec();
    Mock::given(method("GET"))
        .and(path("/3/archives/python-3.13-docs-pdf-a4.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = CachedSession::new(&config).unwrap();
    let outcome = Mode::Download.run(&mut session, &config).await.unwrap();

    let saved = match outcome {
        Outcome::Saved(path) => path,
        other => panic!("expected a saved file, got {:?}", other),
    };

    let downloads = config.paths.downloads_dir();
    let files: Vec<_> = std::fs::read_dir(&downloads)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files, vec![saved.clone()]);
    assert_eq!(saved, downloads.join("python-3.13-docs-pdf-a4.zip"));
    assert_eq!(std::fs::read(&saved).unwrap(), archive);
}

#[tokio::test]
async fn test_pep_tally_and_total() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_html(
        &mock_server,
        "/peps/",
        r#"<html><body><section id="numerical-index">
        <table class="pep-zero-table"><thead><tr><th>Status</th><th>PEP</th></tr></thead>
        <tbody>
          <tr><td><abbr title="Standards Track, Final">SF</abbr></td><td><a href="pep-0001/">1</a></td></tr>
          <tr><td><abbr title="Standards Track, Final">SF</abbr></td><td><a href="pep-0002/">2</a></td></tr>
          <tr><td><abbr title="Standards Track, ?">SX</abbr></td><td><a href="pep-0003/">3</a></td></tr>
          <tr><td><abbr title="Informational, Active">IA</abbr></td><td><a href="pep-0004/">4</a></td></tr>
          <tr><td><abbr title="Process, Active">PA</abbr></td><td><a href="pep-0005/">5</a></td></tr>
        </tbody></table>
        </section></body></html>"#,
    )
    .await;
    // Expected status
    mount_html(&mock_server, "/peps/pep-0001/", &pep_page("Final")).await;
    // Known code, unexpected status: counted under the status seen on the page
    mount_html(&mock_server, "/peps/pep-0002/", &pep_page("Accepted")).await;
    // Unknown code: not counted
    mount_html(&mock_server, "/peps/pep-0003/", &pep_page("Final")).await;
    // pep-0004 is not mounted: 404, skipped
    mount_html(&mock_server, "/peps/pep-0005/", &pep_page("Active")).await;

    let mut session = CachedSession::new(&config).unwrap();
    let rows = expect_rows(Mode::Pep.run(&mut session, &config).await.unwrap());

    assert_eq!(
        rows,
        vec![
            vec!["Final".to_string(), "1".to_string()],
            vec!["Accepted".to_string(), "1".to_string()],
            vec!["Active".to_string(), "1".to_string()],
            vec!["Total:".to_string(), "5".to_string()],
        ]
    );
    assert_eq!(session.misses().len(), 1);
    assert!(session.misses()[0].as_str().ends_with("/peps/pep-0004/"));
}

#[tokio::test]
async fn test_repeated_requests_served_from_cache() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    Mock::given(method("GET"))
        .and(path("/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sidebar(
            r#"<ul><li><a href="https://www.python.org/doc/versions/">All versions</a></li></ul>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = CachedSession::new(&config).unwrap();
    let first = expect_rows(Mode::LatestVersions.run(&mut session, &config).await.unwrap());
    drop(session);

    // A new session over the same cache file does not hit the server again
    let mut session = CachedSession::new(&config).unwrap();
    let second = expect_rows(Mode::LatestVersions.run(&mut session, &config).await.unwrap());

    assert_eq!(first, second);
    assert_eq!(session.cache().len().unwrap(), 1);
}

#[tokio::test]
async fn test_clear_cache_refetches() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    Mock::given(method("GET"))
        .and(path("/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sidebar(
            r#"<ul><li><a href="https://www.python.org/doc/versions/">All versions</a></li></ul>"#,
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut session = CachedSession::new(&config).unwrap();
    Mode::LatestVersions.run(&mut session, &config).await.unwrap();
    assert_eq!(session.clear_cache().unwrap(), 1);
    Mode::LatestVersions.run(&mut session, &config).await.unwrap();
}

#[tokio::test]
async fn test_file_output_round_trips() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_html(
        &mock_server,
        "/3/",
        &sidebar(
            r#"<ul>
              <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
              <li><a href="https://docs.python.org/3.12/">Python 3.12 (security-fixes, "old")</a></li>
              <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
            </ul>"#,
        ),
    )
    .await;

    let mut session = CachedSession::new(&config).unwrap();
    let results = match Mode::LatestVersions.run(&mut session, &config).await.unwrap() {
        Outcome::Rows(results) => results,
        other => panic!("expected rows, got {:?}", other),
    };

    let path = control_output(&results, Some(OutputMode::File), &config.paths)
        .unwrap()
        .expect("file output returns the written path");

    assert_eq!(path.parent().unwrap(), config.paths.results_dir());
    let read_back = read_csv(&path).unwrap();
    assert_eq!(read_back, results.with_header());
    assert_eq!(read_back[0], vec!["Documentation link", "Version", "Status"]);
    assert_eq!(read_back[2][2], "security-fixes, \"old\"");
}
