//! SQLite [`RecordStore`] backed by the `prompts` table.
//!
//! Connection setup mirrors the rest of the CLI: WAL journal, small pool,
//! parent directory created on demand. The batched delete runs inside a
//! single transaction so a partial failure rolls back and surfaces as a
//! whole-batch failure.

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::config::Config;
use crate::models::Record;
use crate::similarity::fingerprint;

use super::RecordStore;

/// SQLite can bind at most 999 parameters per statement on older builds;
/// delete statements are chunked under that, inside one transaction.
const DELETE_CHUNK: usize = 500;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database configured in `[db]`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let db_path = &config.db.path;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn fetch_records(&self) -> Result<Vec<Record>> {
        let rows = sqlx::query(
            "SELECT id, title, body, created_at, updated_at FROM prompts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(|row| {
                let title: String = row.get("title");
                let body: String = row.get("body");
                let fp = fingerprint(&title, &body);
                Record {
                    id: row.get("id"),
                    title,
                    body,
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                    fingerprint: fp,
                }
            })
            .collect();

        Ok(records)
    }

    async fn delete_records(&self, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut deleted: u64 = 0;

        for chunk in ids.chunks(DELETE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("DELETE FROM prompts WHERE id IN ({})", placeholders);
            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id);
            }
            let result = query.execute(&mut *tx).await?;
            deleted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(deleted)
    }
}
