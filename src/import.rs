//! JSON import into the prompt store.
//!
//! Reads a JSON array of prompt objects and upserts them by id. Missing ids
//! get a generated UUID, missing timestamps default to now, and missing
//! title/body become empty strings. Absence is resolved here at the
//! boundary, never inside the similarity pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::store::sqlite::SqliteStore;

/// One prompt object as it appears in the import file.
#[derive(Debug, Deserialize)]
struct ImportPrompt {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    updated_at: Option<i64>,
}

/// Import prompts from `path` and print a summary.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let prompts: Vec<ImportPrompt> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))?;

    let store = SqliteStore::connect(config).await?;
    let pool = store.pool();
    let now = chrono::Utc::now().timestamp();

    let mut imported = 0u64;
    let mut generated_ids = 0u64;

    for prompt in &prompts {
        let id = match &prompt.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => {
                generated_ids += 1;
                Uuid::new_v4().to_string()
            }
        };
        let title = prompt.title.clone().unwrap_or_default();
        let body = prompt.body.clone().unwrap_or_default();
        let created_at = prompt.created_at.unwrap_or(now);
        let updated_at = prompt.updated_at.unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO prompts (id, title, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(&body)
        .bind(created_at)
        .bind(updated_at)
        .execute(pool)
        .await?;

        imported += 1;
    }

    println!("import {}", path.display());
    println!("  prompts imported: {}", imported);
    if generated_ids > 0 {
        println!("  ids generated: {}", generated_ids);
    }
    println!("ok");

    store.close().await;
    Ok(())
}
