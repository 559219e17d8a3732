//! The cooperative control loop: pick the next job, run it, repeat.

use crate::control::Shutdown;

use super::error::SchedulerError;
use super::select::Scheduler;

/// Drive the scheduler until shutdown fires or `max_jobs` jobs have run.
///
/// Jobs run strictly one after another; the next selection happens only
/// after the previous job (including all its retries and sleeps) returned.
/// Returns the number of jobs executed. Configuration and usage errors
/// propagate; job failures do not.
pub async fn run_loop(
    scheduler: &mut Scheduler,
    shutdown: &Shutdown,
    max_jobs: Option<u64>,
) -> Result<u64, SchedulerError> {
    let mut executed = 0u64;
    loop {
        if max_jobs.is_some_and(|max| executed >= max) || shutdown.is_triggered() {
            break;
        }
        let job = match scheduler.next_job(shutdown).await {
            Ok(job) => job,
            Err(SchedulerError::ShutdownRequested) => break,
            Err(e) => return Err(e),
        };
        tracing::info!(job = %job.title(), "running job");
        job.execute(shutdown).await?;
        executed += 1;
    }
    tracing::info!(executed, "control loop stopped");
    Ok(executed)
}
