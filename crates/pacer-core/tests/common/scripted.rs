//! Scripted source adapter and in-memory sink.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pacer_core::pipeline::{RecordSink, RunRecord};
use pacer_core::retry::FetchError;
use pacer_core::sources::SourceAdapter;

/// Returns the scripted results in order, then succeeds with no records.
pub struct ScriptedSource {
    name: String,
    steps: Mutex<VecDeque<Result<Vec<String>, FetchError>>>,
}

impl ScriptedSource {
    pub fn new(name: &str, steps: Vec<Result<Vec<String>, FetchError>>) -> Self {
        Self {
            name: name.to_string(),
            steps: Mutex::new(steps.into()),
        }
    }
}

#[async_trait]
impl SourceAdapter for ScriptedSource {
    type Record = String;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Keeps every committed batch.
#[derive(Default)]
pub struct MemorySink {
    batches: Mutex<Vec<(RunRecord, Vec<String>)>>,
}

impl MemorySink {
    pub fn batches(&self) -> Vec<(RunRecord, Vec<String>)> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink<String> for MemorySink {
    async fn commit_batch(&self, summary: &RunRecord, records: &[String]) -> anyhow::Result<()> {
        self.batches
            .lock()
            .unwrap()
            .push((summary.clone(), records.to_vec()));
        Ok(())
    }
}
