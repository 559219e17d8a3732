//! Run summaries and the record shape the persistence sink stores.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Outcome summary persisted for every pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub source_name: String,
    pub title: String,
    pub success: bool,
    /// Last error on failure; `None` on success.
    pub message: Option<String>,
    /// Counted attempts (rate-limited calls excluded). Always >= 1.
    pub attempts: u32,
    pub elapsed: Duration,
    /// Unix seconds.
    pub created_at: i64,
}

/// A domain record the sink can persist without knowing its schema.
pub trait StoredRecord: Send + Sync {
    /// Logical record type (e.g. the source name). Stored alongside the payload.
    fn kind(&self) -> &str;
    /// JSON payload.
    fn payload(&self) -> serde_json::Result<String>;
}

/// Opaque JSON record as produced by the HTTP JSON adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    pub kind: String,
    pub value: serde_json::Value,
}

impl StoredRecord for JsonRecord {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.value)
    }
}

/// Current time as Unix seconds.
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
