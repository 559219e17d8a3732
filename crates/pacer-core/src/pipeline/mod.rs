//! Fetch-and-persist pipeline.
//!
//! Calls a source adapter with bounded retries, waits out rate limits
//! without spending the failure budget, and commits a [`RunRecord`] (plus
//! records on success) atomically through a [`RecordSink`].

mod record;
mod run;
mod sink;
mod work;

pub use record::{JsonRecord, RunRecord, StoredRecord};
pub use run::{FetchPipeline, PipelineError, PipelineReport, MIN_RATE_LIMIT_WAIT};
pub use sink::RecordSink;
pub use work::FetchJob;
