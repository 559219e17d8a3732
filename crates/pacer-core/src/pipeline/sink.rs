//! Persistence sink contract.

use async_trait::async_trait;

use super::record::RunRecord;

/// Accepts a run summary and its records, committed together.
///
/// Implementations must be all-or-nothing: either the summary and every
/// record are stored, or nothing is.
#[async_trait]
pub trait RecordSink<R: Sync>: Send + Sync {
    async fn commit_batch(&self, summary: &RunRecord, records: &[R]) -> anyhow::Result<()>;
}
