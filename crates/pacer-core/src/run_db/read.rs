//! Read side: recent runs and per-source statistics.

use anyhow::Result;
use sqlx::Row;
use std::time::Duration;

use super::db::RunDb;
use super::types::{RunId, RunRow, SourceStats};

impl RunDb {
    /// Most recent runs, newest first.
    pub async fn list_runs(&self, limit: u32) -> Result<Vec<RunRow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_name, title, success, message, attempts, elapsed_ms, created_at
            FROM run_records
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let attempts: i64 = row.get("attempts");
            let elapsed_ms: i64 = row.get("elapsed_ms");
            out.push(RunRow {
                id: row.get("id"),
                source_name: row.get("source_name"),
                title: row.get("title"),
                success: row.get("success"),
                message: row.get("message"),
                attempts: u32::try_from(attempts).unwrap_or(0),
                elapsed: Duration::from_millis(u64::try_from(elapsed_ms).unwrap_or(0)),
                created_at: row.get("created_at"),
            });
        }
        Ok(out)
    }

    /// Number of records stored for one run.
    pub async fn count_records(&self, run_id: RunId) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM records WHERE run_id = ?1")
            .bind(run_id)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.get("n");
        Ok(n.max(0) as u64)
    }

    /// Payloads stored for one run, in insertion order.
    pub async fn record_payloads(&self, run_id: RunId) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT payload FROM records WHERE run_id = ?1 ORDER BY id ASC")
            .bind(run_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("payload")).collect())
    }

    /// Success/failure counts per source, sorted by source name.
    pub async fn source_stats(&self) -> Result<Vec<SourceStats>> {
        let rows = sqlx::query(
            r#"
            SELECT r.source_name AS source_name,
                   SUM(CASE WHEN r.success THEN 1 ELSE 0 END) AS successes,
                   SUM(CASE WHEN r.success THEN 0 ELSE 1 END) AS failures,
                   (SELECT COUNT(*) FROM records rec
                      JOIN run_records rr ON rr.id = rec.run_id
                     WHERE rr.source_name = r.source_name) AS records,
                   MAX(r.created_at) AS last_run_at
            FROM run_records r
            GROUP BY r.source_name
            ORDER BY r.source_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let successes: i64 = row.get("successes");
                let failures: i64 = row.get("failures");
                let records: i64 = row.get("records");
                SourceStats {
                    source_name: row.get("source_name"),
                    successes: successes.max(0) as u64,
                    failures: failures.max(0) as u64,
                    records: records.max(0) as u64,
                    last_run_at: row.get("last_run_at"),
                }
            })
            .collect())
    }
}
