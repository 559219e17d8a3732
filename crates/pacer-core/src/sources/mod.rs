//! Source adapters: the only code that talks to external endpoints.
//!
//! An adapter performs one fetch per call and maps every problem into a
//! [`FetchError`]; retries and persistence belong to the pipeline.

mod build;
mod http_json;
pub mod paged;

use async_trait::async_trait;

use crate::retry::FetchError;

pub use build::{build_scheduler, job_title};
pub use http_json::{HttpJsonSource, DEFAULT_MAX_BODY_BYTES};
pub use paged::{page_requests, PageRequest};

/// One call against an external source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    type Record: Send + Sync + 'static;

    /// Source name recorded in every [`RunRecord`](crate::pipeline::RunRecord).
    fn name(&self) -> &str;

    /// Fetch once. No retries here.
    async fn fetch(&self) -> Result<Vec<Self::Record>, FetchError>;
}
