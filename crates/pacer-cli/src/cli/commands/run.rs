//! `pacer run` – drive the scheduler until Ctrl-C or `--max-jobs`.

use anyhow::{Context, Result};
use pacer_core::config::PacerConfig;
use pacer_core::control::Shutdown;
use pacer_core::run_db::RunDb;
use pacer_core::scheduler;
use pacer_core::sources::build_scheduler;
use std::sync::Arc;
use std::time::Instant;

pub async fn run_scheduler(db: RunDb, cfg: &PacerConfig, max_jobs: Option<u64>) -> Result<()> {
    let mut sched = build_scheduler(cfg, Arc::new(db)).context("build scheduler")?;
    println!(
        "Scheduling {} job(s) in {} group(s). Press Ctrl-C to stop.",
        sched.job_count(),
        sched.groups().len()
    );

    let shutdown = Shutdown::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping after current sleep");
            on_signal.trigger();
        }
    });

    let started = Instant::now();
    let executed = scheduler::run_loop(&mut sched, &shutdown, max_jobs).await?;
    println!(
        "Ran {} job(s) in {:.1}s.",
        executed,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
