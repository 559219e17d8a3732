//! Fetch-and-persist with bounded retries and rate-limit aware waits.

use std::time::Duration;

use tokio::time::Instant;

use crate::control::{sleep_or_shutdown, Shutdown};
use crate::retry::{classify, BackoffPolicy, ErrorKind, FetchError, RetryDecision};
use crate::scheduler::DEFAULT_POLL_INTERVAL;
use crate::sources::SourceAdapter;

use super::record::{unix_timestamp, RunRecord};
use super::sink::RecordSink;

/// Shortest rate-limit wait honoured; smaller requests are raised to this.
pub const MIN_RATE_LIMIT_WAIT: Duration = DEFAULT_POLL_INTERVAL;

/// Error that ends a pipeline invocation without a persisted summary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The sink rejected the batch. Not retried; an unrecorded fetch is data loss.
    #[error("failed to persist run: {0:#}")]
    Commit(anyhow::Error),
    #[error("pipeline cancelled by shutdown")]
    Cancelled,
}

/// What one invocation stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub summary: RunRecord,
    /// Number of domain records committed with the summary (0 on exhaustion).
    pub stored: usize,
}

/// Runs a source adapter until it succeeds or the failure budget is spent,
/// then commits the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchPipeline {
    policy: BackoffPolicy,
}

impl FetchPipeline {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Fetch from `adapter` and persist the outcome through `sink`.
    ///
    /// - rate limited: sleep the requested wait (at least `MIN_RATE_LIMIT_WAIT`); the attempt is not counted
    /// - any other error: counted; linear backoff before the next try
    /// - budget spent: persist a failure summary and no records
    /// - success: persist the summary and every record in one batch
    pub async fn run<A, S>(
        &self,
        title: &str,
        adapter: &A,
        sink: &S,
        shutdown: &Shutdown,
    ) -> Result<PipelineReport, PipelineError>
    where
        A: SourceAdapter + ?Sized,
        S: RecordSink<A::Record> + ?Sized,
    {
        let source = adapter.name();
        tracing::info!(source, title, "updating data");
        let started = Instant::now();

        let mut attempts = 0u32;
        let mut failures = 0u32;
        let result: Result<Vec<A::Record>, FetchError> = loop {
            let err = match adapter.fetch().await {
                Ok(records) => {
                    attempts += 1;
                    break Ok(records);
                }
                Err(e) => e,
            };

            match classify(&err) {
                ErrorKind::RateLimited(requested) => {
                    let wait = requested.max(MIN_RATE_LIMIT_WAIT);
                    if wait != requested {
                        tracing::warn!(
                            source,
                            title,
                            requested_ms = requested.as_millis() as u64,
                            "rate limit wait below minimum, using {:?}",
                            wait
                        );
                    }
                    tracing::info!(
                        source,
                        title,
                        wait_secs = wait.as_secs_f64(),
                        "rate limited, waiting before retry"
                    );
                    sleep_or_shutdown(wait, shutdown)
                        .await
                        .map_err(|_| PipelineError::Cancelled)?;
                }
                ErrorKind::Malformed | ErrorKind::Failure => {
                    attempts += 1;
                    failures += 1;
                    tracing::info!(
                        source,
                        title,
                        failures,
                        max_attempts = self.policy.max_attempts,
                        "fetch failed: {:#}",
                        err
                    );
                    match self.policy.decide(failures) {
                        RetryDecision::GiveUp => break Err(err),
                        RetryDecision::RetryAfter(d) => {
                            tracing::info!(source, title, "sleeping {}s before retry", d.as_secs_f64());
                            sleep_or_shutdown(d, shutdown)
                                .await
                                .map_err(|_| PipelineError::Cancelled)?;
                        }
                    }
                }
            }
        };

        let (success, message, records) = match result {
            Ok(records) => (true, None, records),
            Err(e) => {
                tracing::warn!(
                    source,
                    title,
                    "max failures reached ({}/{}), giving up",
                    failures,
                    self.policy.max_attempts
                );
                (false, Some(format!("{:#}", e)), Vec::new())
            }
        };

        let summary = RunRecord {
            source_name: source.to_string(),
            title: title.to_string(),
            success,
            message,
            attempts,
            elapsed: started.elapsed(),
            created_at: unix_timestamp(),
        };

        sink.commit_batch(&summary, &records)
            .await
            .map_err(PipelineError::Commit)?;

        tracing::info!(
            source,
            title,
            success,
            attempts,
            stored = records.len(),
            "data update took {:.2}s",
            summary.elapsed.as_secs_f64()
        );
        Ok(PipelineReport {
            summary,
            stored: records.len(),
        })
    }
}
