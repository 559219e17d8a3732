//! Cooldown-governed collection of jobs rotated together.

use std::time::Duration;

use tokio::time::Instant;

use super::error::SchedulerError;
use super::job::Job;

/// Ordered, non-empty collection of jobs sharing a group-level cooldown.
#[derive(Debug)]
pub struct JobGroup {
    name: String,
    jobs: Vec<Job>,
    cooldown: Duration,
    last_selected_at: Option<Instant>,
    rotation_offset: usize,
}

impl JobGroup {
    /// Create a group. Rejects an empty job list: such a group could never produce work.
    pub fn new(
        name: impl Into<String>,
        jobs: Vec<Job>,
        cooldown: Duration,
    ) -> Result<Self, SchedulerError> {
        let name = name.into();
        if jobs.is_empty() {
            return Err(SchedulerError::EmptyGroup(name));
        }
        Ok(Self {
            name,
            jobs,
            cooldown,
            last_selected_at: None,
            rotation_offset: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn last_selected_at(&self) -> Option<Instant> {
        self.last_selected_at
    }

    /// True once `cooldown` has elapsed since a job was last selected from this group.
    pub fn is_available(&self) -> bool {
        match self.last_selected_at {
            None => true,
            Some(selected) => selected
                .checked_add(self.cooldown)
                .is_some_and(|ready| Instant::now() >= ready),
        }
    }

    /// Scan from the rotation offset for the first available job. On a hit,
    /// advances the offset and stamps `last_selected_at`.
    pub(super) fn select_index(&mut self) -> Option<usize> {
        let n = self.jobs.len();
        let start = self.rotation_offset % n;
        let idx = (0..n)
            .map(|i| (start + i) % n)
            .find(|&idx| self.jobs[idx].is_available())?;

        tracing::debug!(
            group = %self.name,
            job_offset = self.rotation_offset,
            job_count = n,
            selected = idx,
            "selected job"
        );
        self.rotation_offset = self.rotation_offset.wrapping_add(1);
        self.last_selected_at = Some(Instant::now());
        Some(idx)
    }

    pub(super) fn job_mut(&mut self, idx: usize) -> &mut Job {
        &mut self.jobs[idx]
    }

    /// Select the next available job without blocking.
    ///
    /// Returns `NoJobAvailable` when every job is still cooling down; the
    /// scheduler owns the wait/retry policy.
    pub fn select_job(&mut self) -> Result<&mut Job, SchedulerError> {
        match self.select_index() {
            Some(idx) => Ok(&mut self.jobs[idx]),
            None => Err(SchedulerError::NoJobAvailable(self.name.clone())),
        }
    }
}
