//! Row types returned by the run database.

use std::time::Duration;

/// Run identifier (`run_records.id`).
pub type RunId = i64;

/// One persisted run summary, as read back for `pacer status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRow {
    pub id: RunId,
    pub source_name: String,
    pub title: String,
    pub success: bool,
    pub message: Option<String>,
    pub attempts: u32,
    pub elapsed: Duration,
    pub created_at: i64,
}

/// Per-source outcome counts for `pacer stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub source_name: String,
    pub successes: u64,
    pub failures: u64,
    /// Records stored across all successful runs.
    pub records: u64,
    /// Unix seconds of the most recent run.
    pub last_run_at: i64,
}
