//! Integration test: fetch jobs driven by the scheduler on a virtual clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::scripted::{MemorySink, ScriptedSource};
use pacer_core::control::Shutdown;
use pacer_core::pipeline::{FetchJob, FetchPipeline};
use pacer_core::retry::{BackoffPolicy, FetchError};
use pacer_core::scheduler::{run_loop, Job, Scheduler};
use tokio::time::Instant;

fn fetch_job(
    title: &str,
    cooldown_secs: u64,
    steps: Vec<Result<Vec<String>, FetchError>>,
    sink: &Arc<MemorySink>,
) -> Job {
    let work = FetchJob::new(
        title,
        ScriptedSource::new(title, steps),
        Arc::clone(sink),
        FetchPipeline::new(BackoffPolicy::default().with_max_attempts(2)),
    );
    Job::new(title, Duration::from_secs(cooldown_secs), work)
}

#[tokio::test(start_paused = true)]
async fn failing_job_is_recorded_and_loop_continues() {
    let sink = Arc::new(MemorySink::default());
    let mut sched = Scheduler::new();
    sched
        .add_group(
            "g",
            vec![
                fetch_job(
                    "bad",
                    0,
                    vec![
                        Err(FetchError::Http(500)),
                        Err(FetchError::Http(502)),
                    ],
                    &sink,
                ),
                fetch_job("good", 0, vec![Ok(vec!["r1".into(), "r2".into()])], &sink),
            ],
            Duration::from_secs(2),
        )
        .unwrap();

    let start = Instant::now();
    let executed = run_loop(&mut sched, &Shutdown::new(), Some(2)).await.unwrap();
    assert_eq!(executed, 2);

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].0.title, "bad");
    assert!(!batches[0].0.success);
    assert_eq!(batches[0].0.message.as_deref(), Some("HTTP 502"));
    assert!(batches[0].1.is_empty());
    assert_eq!(batches[1].0.title, "good");
    assert_eq!(batches[1].1, vec!["r1", "r2"]);

    // One 5s backoff inside "bad"; the 2s group delay elapsed during it.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_job_holds_the_loop() {
    let sink = Arc::new(MemorySink::default());
    let mut sched = Scheduler::new();
    sched
        .add_group(
            "slow",
            vec![fetch_job(
                "throttled",
                0,
                vec![
                    Err(FetchError::RateLimited {
                        wait_for: Duration::from_secs(30),
                    }),
                    Ok(vec!["x".into()]),
                ],
                &sink,
            )],
            Duration::ZERO,
        )
        .unwrap();
    sched
        .add_group(
            "fast",
            vec![fetch_job("quick", 0, vec![Ok(vec![])], &sink)],
            Duration::ZERO,
        )
        .unwrap();

    let start = Instant::now();
    run_loop(&mut sched, &Shutdown::new(), Some(2)).await.unwrap();
    let batches = sink.batches();
    assert_eq!(batches[0].0.title, "throttled");
    assert_eq!(batches[0].0.attempts, 1);
    assert_eq!(batches[1].0.title, "quick");
    assert!(start.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_long_backoff() {
    let sink = Arc::new(MemorySink::default());
    let mut sched = Scheduler::new();
    sched
        .add_group(
            "g",
            vec![fetch_job(
                "flaky",
                0,
                vec![Err(FetchError::malformed("empty page")), Ok(vec![])],
                &sink,
            )],
            Duration::ZERO,
        )
        .unwrap();

    let shutdown = Shutdown::new();
    let remote = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        remote.trigger();
    });

    let start = Instant::now();
    let executed = run_loop(&mut sched, &shutdown, None).await.unwrap();
    assert_eq!(executed, 1, "interrupted job still counts as executed");
    assert!(sink.batches().is_empty(), "cancelled run is not persisted");
    assert!(start.elapsed() < Duration::from_secs(5));
}
