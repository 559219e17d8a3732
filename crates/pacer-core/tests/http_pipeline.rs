//! Integration test: HTTP JSON source against a local script server,
//! persisted through the SQLite run database.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::script_server::{self, Canned};
use pacer_core::config::PacerConfig;
use pacer_core::control::Shutdown;
use pacer_core::pipeline::FetchPipeline;
use pacer_core::retry::{BackoffPolicy, FetchError};
use pacer_core::run_db::RunDb;
use pacer_core::scheduler;
use pacer_core::sources::{build_scheduler, HttpJsonSource, SourceAdapter};
use tempfile::tempdir;

fn fast_policy(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy {
        max_attempts,
        initial: Duration::from_millis(20),
        step: Duration::from_millis(20),
    }
}

async fn temp_db() -> (tempfile::TempDir, RunDb) {
    let dir = tempdir().unwrap();
    let db = RunDb::open_at(dir.path().join("runs.db")).await.unwrap();
    (dir, db)
}

#[tokio::test]
async fn success_persists_run_and_records() {
    let server = script_server::start(vec![Canned::json(
        r#"{"results":[{"name":"a"},{"name":"b"}]}"#,
    )]);
    let source = HttpJsonSource::new("listings", format!("{}/items", server.base_url))
        .with_items_pointer("/results");
    let (_dir, db) = temp_db().await;

    let report = FetchPipeline::new(fast_policy(3))
        .run("page 0", &source, &db, &Shutdown::new())
        .await
        .unwrap();
    assert!(report.summary.success);
    assert_eq!(report.stored, 2);

    let runs = db.list_runs(10).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source_name, "listings");
    assert_eq!(db.count_records(runs[0].id).await.unwrap(), 2);
    let payloads = db.record_payloads(runs[0].id).await.unwrap();
    assert_eq!(payloads[0], r#"{"name":"a"}"#);
}

#[tokio::test]
async fn retry_after_is_honoured_and_not_counted() {
    let server = script_server::start(vec![
        Canned::status(429).header("Retry-After", "1"),
        Canned::json("[1,2,3]"),
    ]);
    let source = HttpJsonSource::new("quotes", format!("{}/q", server.base_url));
    let (_dir, db) = temp_db().await;

    let start = Instant::now();
    let report = FetchPipeline::new(fast_policy(1))
        .run("quotes", &source, &db, &Shutdown::new())
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert!(report.summary.success);
    assert_eq!(report.summary.attempts, 1);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn server_errors_exhaust_budget() {
    let server = script_server::start(vec![Canned::status(500)]);
    let source = HttpJsonSource::new("broken", format!("{}/x", server.base_url));
    let (_dir, db) = temp_db().await;

    let report = FetchPipeline::new(fast_policy(3))
        .run("broken", &source, &db, &Shutdown::new())
        .await
        .unwrap();
    assert!(!report.summary.success);
    assert_eq!(report.summary.attempts, 3);
    assert_eq!(report.summary.message.as_deref(), Some("HTTP 500"));
    assert_eq!(server.requests().len(), 3);

    let runs = db.list_runs(10).await.unwrap();
    assert_eq!(db.count_records(runs[0].id).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_then_valid_payload() {
    let server = script_server::start(vec![
        Canned::json(r#"{"unexpected":true}"#),
        Canned::json(r#"{"results":[{"id":7}]}"#),
    ]);
    let source = HttpJsonSource::new("listings", format!("{}/items", server.base_url))
        .with_items_pointer("/results");
    let (_dir, db) = temp_db().await;

    let report = FetchPipeline::new(fast_policy(3))
        .run("listings", &source, &db, &Shutdown::new())
        .await
        .unwrap();
    assert!(report.summary.success);
    assert_eq!(report.summary.attempts, 2);
    assert_eq!(report.stored, 1);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let source = HttpJsonSource::new("gone", format!("http://127.0.0.1:{}/", port))
        .with_timeout(Duration::from_secs(2));
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn oversized_body_fails_as_transport_error() {
    let big = format!("[{}]", vec!["1"; 4096].join(","));
    let server = script_server::start(vec![Canned::json(&big)]);
    let source = HttpJsonSource::new("huge", format!("{}/big", server.base_url))
        .with_max_body_bytes(1024);
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Transport(_))
    ));

    let roomy = HttpJsonSource::new("huge", format!("{}/big", server.base_url));
    assert_eq!(roomy.fetch().await.unwrap().len(), 4096);
}

#[tokio::test]
async fn configured_pages_run_through_scheduler() {
    let server = script_server::start(vec![Canned::json(r#"{"results":[{"id":1}]}"#)]);
    let toml = r#"
        poll_interval_ms = 10

        [[groups]]
        name = "market"
        group_delay_secs = 0

          [[groups.sources]]
          name = "listings"
          url = "BASE/items?start={start}&count={count}"
          items_pointer = "/results"
          job_cooldown_secs = 0
          pages = { total_items = 5, page_size = 2 }
    "#
    .replace("BASE", &server.base_url);
    let cfg: PacerConfig = toml::from_str(&toml).unwrap();
    cfg.validate().unwrap();

    let (_dir, db) = temp_db().await;
    let mut sched = build_scheduler(&cfg, Arc::new(db.clone())).unwrap();
    assert_eq!(sched.job_count(), 3);

    let executed = scheduler::run_loop(&mut sched, &Shutdown::new(), Some(3))
        .await
        .unwrap();
    assert_eq!(executed, 3);

    assert_eq!(
        server.requests(),
        vec![
            "/items?start=0&count=2",
            "/items?start=2&count=2",
            "/items?start=4&count=2",
        ]
    );
    let mut titles: Vec<String> = db
        .list_runs(10)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    titles.sort();
    assert_eq!(
        titles,
        vec![
            "listings (start=0, count=2)",
            "listings (start=2, count=2)",
            "listings (start=4, count=2)",
        ]
    );
    let stats = db.source_stats().await.unwrap();
    assert_eq!(stats[0].successes, 3);
    assert_eq!(stats[0].records, 3);
}
