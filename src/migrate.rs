//! Schema migration for the prompt store.
//!
//! `pdd init` creates the `prompts` table and its indexes. Idempotent:
//! running it multiple times is safe.

use anyhow::Result;

use crate::config::Config;
use crate::store::sqlite::SqliteStore;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let store = SqliteStore::connect(config).await?;
    let pool = store.pool();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS prompts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL DEFAULT '',
            body TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_prompts_updated_at ON prompts(updated_at DESC)")
        .execute(pool)
        .await?;

    store.close().await;
    Ok(())
}
