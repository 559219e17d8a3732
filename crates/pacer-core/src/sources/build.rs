//! Expand configuration into a ready-to-run scheduler.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{PacerConfig, SourceConfig};
use crate::pipeline::{FetchJob, FetchPipeline, JsonRecord, RecordSink};
use crate::scheduler::{Job, Scheduler};

use super::http_json::HttpJsonSource;
use super::paged::{page_requests, PageRequest};

/// Title recorded for a job; paged sources carry their window.
pub fn job_title(source: &str, page: Option<PageRequest>) -> String {
    match page {
        Some(p) => format!("{} (start={}, count={})", source, p.start, p.count),
        None => source.to_string(),
    }
}

fn source_jobs<S>(cfg: &PacerConfig, source: &SourceConfig, sink: &Arc<S>) -> Vec<Job>
where
    S: RecordSink<JsonRecord> + ?Sized + 'static,
{
    let pipeline = FetchPipeline::new(cfg.policy_for(source));
    let pages: Vec<Option<PageRequest>> = match source.pages {
        Some(p) => page_requests(p.total_items, p.page_size)
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None],
    };

    pages
        .into_iter()
        .map(|page| {
            let url = match page {
                Some(p) => p.apply(&source.url),
                None => source.url.clone(),
            };
            let adapter = HttpJsonSource::new(&source.name, url)
                .with_headers(source.headers.clone())
                .with_items_pointer(&source.items_pointer)
                .with_timeout(source.timeout())
                .with_overload_delay(source.overload_delay())
                .with_max_body_bytes(source.max_body_bytes)
                .reject_empty(source.reject_empty);
            let title = job_title(&source.name, page);
            let work = FetchJob::new(&title, adapter, Arc::clone(sink), pipeline);
            Job::new(title, source.job_cooldown(), work)
        })
        .collect()
}

/// Build one job group per configured group.
///
/// Disabled sources contribute no jobs, and a group left with none is
/// skipped. A group that declares no sources at all is a configuration error.
pub fn build_scheduler<S>(cfg: &PacerConfig, sink: Arc<S>) -> Result<Scheduler>
where
    S: RecordSink<JsonRecord> + ?Sized + 'static,
{
    let mut scheduler = Scheduler::new().with_poll_interval(cfg.poll_interval());

    for group in &cfg.groups {
        let jobs: Vec<Job> = group
            .sources
            .iter()
            .filter(|s| s.enabled)
            .flat_map(|s| source_jobs(cfg, s, &sink))
            .collect();

        if jobs.is_empty() && !group.sources.is_empty() {
            tracing::info!(group = %group.name, "all sources disabled, skipping group");
            continue;
        }

        let count = jobs.len();
        let delay = group.group_delay();
        scheduler
            .add_group(&group.name, jobs, delay)
            .with_context(|| format!("build group '{}'", group.name))?;
        tracing::debug!(group = %group.name, jobs = count, ?delay, "group ready");
    }

    Ok(scheduler)
}
