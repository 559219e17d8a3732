//! Write side: commit a run summary and its records atomically.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::pipeline::{RecordSink, RunRecord, StoredRecord};

use super::db::RunDb;
use super::types::RunId;

impl RunDb {
    /// Insert `summary` and `records` in one transaction; returns the run id.
    /// Nothing is written if any insert fails.
    pub async fn insert_run<R: StoredRecord>(
        &self,
        summary: &RunRecord,
        records: &[R],
    ) -> Result<RunId> {
        let mut tx = self.pool.begin().await?;

        let elapsed_ms = i64::try_from(summary.elapsed.as_millis()).unwrap_or(i64::MAX);
        let run_id = sqlx::query(
            r#"
            INSERT INTO run_records (
                source_name, title, success, message, attempts, elapsed_ms, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&summary.source_name)
        .bind(&summary.title)
        .bind(summary.success)
        .bind(summary.message.as_deref())
        .bind(i64::from(summary.attempts))
        .bind(elapsed_ms)
        .bind(summary.created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for record in records {
            let payload = record
                .payload()
                .with_context(|| format!("serialize {} record", record.kind()))?;
            sqlx::query(
                r#"
                INSERT INTO records (run_id, kind, payload, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(run_id)
            .bind(record.kind())
            .bind(payload)
            .bind(summary.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(run_id)
    }
}

#[async_trait]
impl<R: StoredRecord> RecordSink<R> for RunDb {
    async fn commit_batch(&self, summary: &RunRecord, records: &[R]) -> Result<()> {
        let run_id = self.insert_run(summary, records).await?;
        tracing::debug!(run_id, source = %summary.source_name, records = records.len(), "run committed");
        Ok(())
    }
}
