//! `pacer stats` – per-source outcome counts.

use anyhow::Result;
use pacer_core::run_db::RunDb;

pub async fn run_stats(db: &RunDb) -> Result<()> {
    let stats = db.source_stats().await?;
    if stats.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }
    println!("{:<20} {:>6} {:>6} {:>9}", "SOURCE", "OK", "FAILED", "RECORDS");
    for s in stats {
        println!(
            "{:<20} {:>6} {:>6} {:>9}",
            s.source_name, s.successes, s.failures, s.records
        );
    }
    Ok(())
}
