//! Two-level fair selection: groups first, then jobs within the chosen group.

use std::time::Duration;

use crate::control::{sleep_or_shutdown, Shutdown};

use super::error::SchedulerError;
use super::group::JobGroup;
use super::job::Job;

/// Default interval between scans while nothing is runnable.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ordered collection of job groups.
///
/// The group offset advances only when a group is actually chosen; each group
/// rotates its own jobs independently. So inter-group fairness ("source A,
/// then source B, then A…") is decoupled from intra-group fairness ("page 1,
/// page 2, … of source B").
#[derive(Debug)]
pub struct Scheduler {
    groups: Vec<JobGroup>,
    rotation_offset: usize,
    poll_interval: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            rotation_offset: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Append a group with an explicit cooldown. Fails with `EmptyGroup` if `jobs` is empty.
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        jobs: Vec<Job>,
        cooldown: Duration,
    ) -> Result<(), SchedulerError> {
        let group = JobGroup::new(name, jobs, cooldown)?;
        self.groups.push(group);
        Ok(())
    }

    pub fn groups(&self) -> &[JobGroup] {
        &self.groups
    }

    pub fn job_count(&self) -> usize {
        self.groups.iter().map(|g| g.jobs().len()).sum()
    }

    fn select_indices(&mut self) -> Option<(usize, usize)> {
        let n = self.groups.len();
        let start = self.rotation_offset % n;
        for i in 0..n {
            let gi = (start + i) % n;
            let group = &mut self.groups[gi];
            if !group.is_available() {
                continue;
            }
            if let Some(ji) = group.select_index() {
                tracing::debug!(
                    group_offset = self.rotation_offset,
                    group_count = n,
                    group = gi,
                    "selected group"
                );
                self.rotation_offset = self.rotation_offset.wrapping_add(1);
                return Some((gi, ji));
            }
        }
        None
    }

    /// Non-blocking variant of [`next_job`](Self::next_job): `Ok(None)` when nothing is runnable now.
    pub fn try_next_job(&mut self) -> Result<Option<&mut Job>, SchedulerError> {
        if self.groups.is_empty() {
            return Err(SchedulerError::NoGroupsConfigured);
        }
        Ok(self
            .select_indices()
            .map(|(gi, ji)| self.groups[gi].job_mut(ji)))
    }

    /// Wait until some group and one of its jobs are available, then return that job.
    ///
    /// Never returns "nothing available": it polls every `poll_interval`
    /// until a job is runnable or shutdown is requested.
    pub async fn next_job(&mut self, shutdown: &Shutdown) -> Result<&mut Job, SchedulerError> {
        if self.groups.is_empty() {
            return Err(SchedulerError::NoGroupsConfigured);
        }
        loop {
            if let Some((gi, ji)) = self.select_indices() {
                return Ok(self.groups[gi].job_mut(ji));
            }
            sleep_or_shutdown(self.poll_interval, shutdown)
                .await
                .map_err(|_| SchedulerError::ShutdownRequested)?;
        }
    }
}
