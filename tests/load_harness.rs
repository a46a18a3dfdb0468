//! Load pipeline integration harness: source → ingest → store.
//!
//! # What this covers
//!
//! - **HTTP fetch**: a workbook served over HTTP loads; a 404 is a fetch
//!   error; requests carry `Cache-Control: no-store`.
//! - **File loads**: a workbook on disk loads; a plain-text file renamed
//!   `.xlsx` is a parse error.
//! - **Failure policy**: upload failures keep the last good rows and leave
//!   search enabled; startup failures clear rows and disable search.
//! - **Supersession**: completions of superseded loads, and loads started
//!   before a reset, never change the store.
//!
//! # Running
//!
//! ```sh
//! cargo test --test load_harness
//! ```

mod common;
use common::fake_asset_server::FakeAssetServer;
use common::*;

use pretty_assertions::assert_eq;
use stockbin_core::{Applied, ErrorKind, IngestOptions, LoadError, SearchOptions, Status, Store};
use stockbin_feeds::{load_once, LoadOrigin, Loader, Source};
use tokio::runtime::Handle;

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_workbook_loads() {
    let server = FakeAssetServer::start().await.unwrap();
    server.put("data.xlsx", WorkbookFixture::sample().to_bytes()).await;

    let source = Source::parse(&server.url("data.xlsx")).unwrap();
    let rows = load_once(&source, &IngestOptions::default()).await.unwrap();
    assert_eq!(rows, sample_rows());
    assert_eq!(server.cache_control_seen().await, vec![Some("no-store".to_string())]);
}

#[tokio::test]
async fn http_404_is_fetch_error() {
    let server = FakeAssetServer::start().await.unwrap();
    let source = Source::parse(&server.url("missing.xlsx")).unwrap();

    let err = load_once(&source, &IngestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(err.to_string().contains("404"), "got {err}");
}

#[tokio::test]
async fn http_non_workbook_is_parse_error() {
    let server = FakeAssetServer::start().await.unwrap();
    server.put("data.xlsx", b"<html>not found</html>".to_vec()).await;
    let source = Source::parse(&server.url("data.xlsx")).unwrap();

    let err = load_once(&source, &IngestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn unreachable_host_is_fetch_error() {
    // Bind then drop a listener so the port is closed.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let source = Source::parse(&format!("http://{addr}/data.xlsx")).unwrap();

    let err = load_once(&source, &IngestOptions::default()).await.unwrap_err();
    assert!(matches!(err, LoadError::Fetch(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Store policy through the loader
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_upload_retains_rows_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let good = WorkbookFixture::sample().write_to(dir.path(), "good.xlsx");
    let bad = dir.path().join("notes.xlsx");
    std::fs::write(&bad, "plain text renamed to xlsx").unwrap();

    let mut store = Store::new();
    let mut loader = Loader::new(Handle::current());

    let ticket = store.begin_load();
    loader.spawn(ticket, Source::File(good), IngestOptions::default(), LoadOrigin::Upload);
    let outcome = loader.recv().await.unwrap();
    store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());
    assert_eq!(store.status(), &Status::Ready { count: 5 });

    let ticket = store.begin_load();
    loader.spawn(ticket, Source::File(bad), IngestOptions::default(), LoadOrigin::Upload);
    let outcome = loader.recv().await.unwrap();
    let applied = store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());

    assert_eq!(applied, Applied::Failed { retained: 5 });
    assert_failed!(store, ErrorKind::Parse);
    assert_eq!(store.rows(), &sample_rows()[..]);
    assert!(store.search_enabled());
    assert_bins!(store.search("두부", &SearchOptions::default()), ["A-02", ""]);
}

#[tokio::test]
async fn failed_startup_clears_and_disables_search() {
    let dir = tempfile::tempdir().unwrap();
    let good = WorkbookFixture::sample().write_to(dir.path(), "good.xlsx");

    let mut store = Store::new();
    let mut loader = Loader::new(Handle::current());

    let ticket = store.begin_load();
    loader.spawn(ticket, Source::File(good), IngestOptions::default(), LoadOrigin::Startup);
    let outcome = loader.recv().await.unwrap();
    store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());

    let ticket = store.begin_load();
    let missing = Source::File(dir.path().join("absent.xlsx"));
    loader.spawn(ticket, missing, IngestOptions::default(), LoadOrigin::Reload);
    let outcome = loader.recv().await.unwrap();
    store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());

    assert_failed!(store, ErrorKind::Fetch);
    assert!(store.is_empty());
    assert!(!store.search_enabled());
    assert!(store.search("두부", &SearchOptions::default()).is_empty());
}

#[tokio::test]
async fn superseded_completion_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let first = WorkbookFixture::sample().write_to(dir.path(), "first.xlsx");
    let second = WorkbookFixture::new(HEADERS)
        .record(&["새업체", "새상품", "1", "", "Z-9"])
        .write_to(dir.path(), "second.xlsx");

    let mut store = Store::new();
    let mut loader = Loader::new(Handle::current());

    let stale = store.begin_load();
    loader.spawn(stale, Source::File(first), IngestOptions::default(), LoadOrigin::Startup);
    let current = store.begin_load();
    loader.spawn(current, Source::File(second), IngestOptions::default(), LoadOrigin::Upload);

    // Completion order is up to the runtime; apply both as they arrive.
    for _ in 0..2 {
        let outcome = loader.recv().await.unwrap();
        let applied = store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());
        if outcome.ticket == stale {
            assert_eq!(applied, Applied::Superseded);
        }
    }

    assert_bins!(store.rows(), ["Z-9"]);
}

#[tokio::test]
async fn reset_supersedes_in_flight_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = WorkbookFixture::sample().write_to(dir.path(), "data.xlsx");

    let mut store = Store::new();
    let mut loader = Loader::new(Handle::current());

    let ticket = store.begin_load();
    loader.spawn(ticket, Source::File(path), IngestOptions::default(), LoadOrigin::Startup);
    store.reset();

    let outcome = loader.recv().await.unwrap();
    let applied = store.complete(outcome.ticket, outcome.result, outcome.origin.on_error());
    assert_eq!(applied, Applied::Superseded);
    assert_eq!(store.status(), &Status::Idle);
    assert!(store.is_empty());
}
