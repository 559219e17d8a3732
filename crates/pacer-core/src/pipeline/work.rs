//! Binds a source adapter, a sink and a pipeline into schedulable work.

use std::sync::Arc;

use async_trait::async_trait;

use crate::control::Shutdown;
use crate::scheduler::Work;
use crate::sources::SourceAdapter;

use super::run::{FetchPipeline, PipelineError};
use super::sink::RecordSink;

/// One scheduled fetch: `title` identifies the unit (e.g. a page) in run records.
pub struct FetchJob<A, S: ?Sized> {
    title: String,
    adapter: A,
    sink: Arc<S>,
    pipeline: FetchPipeline,
}

impl<A, S: ?Sized> FetchJob<A, S> {
    pub fn new(title: impl Into<String>, adapter: A, sink: Arc<S>, pipeline: FetchPipeline) -> Self {
        Self {
            title: title.into(),
            adapter,
            sink,
            pipeline,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[async_trait]
impl<A, S> Work for FetchJob<A, S>
where
    A: SourceAdapter + 'static,
    S: RecordSink<A::Record> + ?Sized + 'static,
{
    async fn run(&self, shutdown: &Shutdown) -> anyhow::Result<()> {
        match self
            .pipeline
            .run(&self.title, &self.adapter, self.sink.as_ref(), shutdown)
            .await
        {
            // Exhaustion is recorded as a failed run, not escalated.
            Ok(_) => Ok(()),
            Err(PipelineError::Commit(e)) => {
                tracing::error!(title = %self.title, "run outcome not persisted: {:#}", e);
                Err(e.context(format!("persist run '{}'", self.title)))
            }
            Err(e @ PipelineError::Cancelled) => Err(e.into()),
        }
    }
}
