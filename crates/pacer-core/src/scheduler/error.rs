//! Scheduler error taxonomy.

/// Errors raised by jobs, groups and the scheduler.
///
/// `EmptyGroup` and `NoGroupsConfigured` are configuration errors and fatal at
/// startup. `NotYetAvailable` means a caller broke the scheduling invariant.
/// `NoJobAvailable` is transient and absorbed by `Scheduler::next_job`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("job '{0}' executed before its cooldown elapsed")]
    NotYetAvailable(String),
    #[error("job group '{0}' has no jobs")]
    EmptyGroup(String),
    #[error("no job groups configured")]
    NoGroupsConfigured,
    #[error("no job available in group '{0}'")]
    NoJobAvailable(String),
    #[error("shutdown requested")]
    ShutdownRequested,
}
