//! # prompt-dedupe CLI (`pdd`)
//!
//! The `pdd` binary is the operator interface to the reconciliation engine.
//! It provides commands for database initialization, record import, the
//! deduplication run itself, replaying a saved audit report, and store
//! statistics.
//!
//! ## Usage
//!
//! ```bash
//! pdd --config ./config/pdd.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pdd init` | Create the SQLite database and run schema migrations |
//! | `pdd import <file>` | Upsert prompts from a JSON array |
//! | `pdd dedupe` | Find near-duplicates; dry-run unless `--execute` |
//! | `pdd replay <report>` | Re-derive deletions from a saved report |
//! | `pdd stats` | Show record counts and run sizing |

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use prompt_dedupe::progress::ProgressMode;
use prompt_dedupe::{config, engine, import, migrate, stats};

/// prompt-dedupe CLI: near-duplicate reconciliation for prompt libraries.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/pdd.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "pdd",
    about = "prompt-dedupe — near-duplicate record reconciliation for prompt libraries",
    version,
    long_about = "prompt-dedupe compares every pair of stored prompts with a weighted \
    title/body similarity, groups near-duplicates by transitive closure, keeps the most \
    recently updated record of each group, and writes a replayable audit report before \
    deleting anything."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pdd.toml`. Database, threshold, and report
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./config/pdd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the prompts table. This command
    /// is idempotent; running it multiple times is safe.
    Init,

    /// Import prompts from a JSON file.
    ///
    /// Expects a JSON array of objects with `title` and `body` (both
    /// optional, defaulting to empty) plus optional `id`, `created_at`,
    /// `updated_at`. Existing ids are updated in place.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Find near-duplicate prompts and build a deletion plan.
    ///
    /// Compares every pair of records, clusters those above the similarity
    /// threshold, keeps the most recently updated member of each cluster,
    /// and writes an audit report. Without `--execute` nothing is deleted.
    Dedupe {
        /// Override the similarity threshold from config. Must be in (0, 1].
        #[arg(long)]
        threshold: Option<f64>,

        /// Actually delete the marked records after writing the report.
        #[arg(long)]
        execute: bool,

        /// Progress output: `off`, `human`, or `json`. Defaults to `human`
        /// when stderr is a terminal, `off` otherwise.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Re-derive a deletion list from a previously written audit report.
    ///
    /// Performs no similarity computation: the ids marked deleted in the
    /// report are extracted as-is. Hand-edited reports are honored
    /// literally. Without `--execute` the ids are printed but not deleted.
    Replay {
        /// Path to the audit report JSON file.
        report: PathBuf,

        /// Apply the batched delete for the extracted ids.
        #[arg(long)]
        execute: bool,
    },

    /// Show store statistics and run sizing.
    Stats,
}

fn parse_progress(value: Option<&str>) -> anyhow::Result<ProgressMode> {
    match value {
        None => Ok(ProgressMode::default_for_tty()),
        Some("off") => Ok(ProgressMode::Off),
        Some("human") => Ok(ProgressMode::Human),
        Some("json") => Ok(ProgressMode::Json),
        Some(other) => bail!("Unknown progress mode: {}. Use off, human, or json.", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { file } => {
            import::run_import(&cfg, &file).await?;
        }
        Commands::Dedupe {
            threshold,
            execute,
            progress,
        } => {
            let mode = parse_progress(progress.as_deref())?;
            engine::run_dedupe(&cfg, threshold, execute, mode).await?;
        }
        Commands::Replay { report, execute } => {
            engine::run_replay(&cfg, &report, execute).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
