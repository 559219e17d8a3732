//! `pacer sources` – list configured groups, sources and jobs.

use anyhow::Result;
use pacer_core::config::PacerConfig;
use pacer_core::sources::{job_title, page_requests};

pub fn run_sources(cfg: &PacerConfig) -> Result<()> {
    if cfg.groups.is_empty() {
        println!("No groups configured.");
        return Ok(());
    }
    for group in &cfg.groups {
        println!("{} (group delay {}s)", group.name, group.group_delay_secs);
        for source in &group.sources {
            let state = if source.enabled { "" } else { " [disabled]" };
            println!(
                "  {}{} (cooldown {}s, max attempts {})",
                source.name,
                state,
                source.job_cooldown_secs,
                cfg.policy_for(source).max_attempts
            );
            match source.pages {
                Some(p) => {
                    for page in page_requests(p.total_items, p.page_size) {
                        println!("    {}", job_title(&source.name, Some(page)));
                    }
                }
                None => println!("    {}", job_title(&source.name, None)),
            }
        }
    }
    Ok(())
}
