//! Persistent run database (SQLite via sqlx).
//!
//! Stores one row per pipeline invocation and the records fetched by
//! successful runs. Implements [`RecordSink`](crate::pipeline::RecordSink)
//! so a summary and its records land in a single transaction.

mod db;
mod read;
mod types;
mod write;

pub use db::RunDb;
pub use types::{RunId, RunRow, SourceStats};
