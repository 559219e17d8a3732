//! `pacer status` – show recent run records.

use anyhow::Result;
use pacer_core::run_db::RunDb;

pub async fn run_status(db: &RunDb, limit: u32) -> Result<()> {
    let runs = db.list_runs(limit).await?;
    if runs.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }
    println!(
        "{:<6} {:<8} {:<8} {:<9} {:<20} {}",
        "ID", "RESULT", "TRIES", "ELAPSED", "SOURCE", "TITLE"
    );
    for r in runs {
        println!(
            "{:<6} {:<8} {:<8} {:<9} {:<20} {}",
            r.id,
            if r.success { "ok" } else { "failed" },
            r.attempts,
            format!("{:.1}s", r.elapsed.as_secs_f64()),
            r.source_name,
            r.title
        );
        if let Some(msg) = r.message {
            println!("       {}", msg);
        }
    }
    Ok(())
}
