//! A single repeatable unit of work with its own cooldown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::control::Shutdown;

use super::error::SchedulerError;

/// The work wrapped by a [`Job`].
///
/// Errors are reported to the job, which logs and swallows them.
#[async_trait]
pub trait Work: Send + Sync {
    async fn run(&self, shutdown: &Shutdown) -> anyhow::Result<()>;
}

/// Adapts an async closure into [`Work`].
pub struct FnWork<F>(pub F);

#[async_trait]
impl<F, Fut> Work for FnWork<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self, _shutdown: &Shutdown) -> anyhow::Result<()> {
        (self.0)().await
    }
}

/// Repeatable unit of work. Owned by its `JobGroup`.
pub struct Job {
    title: String,
    cooldown: Duration,
    last_finished_at: Option<Instant>,
    work: Arc<dyn Work>,
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("title", &self.title)
            .field("cooldown", &self.cooldown)
            .field("last_finished_at", &self.last_finished_at)
            .finish_non_exhaustive()
    }
}

impl Job {
    pub fn new(title: impl Into<String>, cooldown: Duration, work: impl Work + 'static) -> Self {
        Self::from_arc(title, cooldown, Arc::new(work))
    }

    pub fn from_arc(title: impl Into<String>, cooldown: Duration, work: Arc<dyn Work>) -> Self {
        Self {
            title: title.into(),
            cooldown,
            last_finished_at: None,
            work,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// When the last execution finished; `None` if the job never ran.
    pub fn last_finished_at(&self) -> Option<Instant> {
        self.last_finished_at
    }

    /// True once `cooldown` has elapsed since the last execution finished.
    /// A cooldown too large to represent as an instant never elapses.
    pub fn is_available(&self) -> bool {
        match self.last_finished_at {
            None => true,
            Some(finished) => finished
                .checked_add(self.cooldown)
                .is_some_and(|ready| Instant::now() >= ready),
        }
    }

    /// Run the wrapped work.
    ///
    /// Fails only with `NotYetAvailable` when called during the cooldown.
    /// Work errors are logged and swallowed. `last_finished_at` is updated
    /// after every attempt.
    pub async fn execute(&mut self, shutdown: &Shutdown) -> Result<(), SchedulerError> {
        if !self.is_available() {
            return Err(SchedulerError::NotYetAvailable(self.title.clone()));
        }

        let started = Instant::now();
        match self.work.run(shutdown).await {
            Ok(()) => tracing::debug!(
                job = %self.title,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "job finished"
            ),
            Err(e) => tracing::warn!(
                job = %self.title,
                "job failed, continuing with next job: {:#}",
                e
            ),
        }

        self.last_finished_at = Some(Instant::now());
        Ok(())
    }
}
