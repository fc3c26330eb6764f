//! Pipeline orchestrator: wires similarity, clustering, planning, and the
//! audit log together against a [`RecordStore`].
//!
//! A run moves through `compare → cluster → plan → log`, then either stops
//! (dry-run) or issues one batched delete (execute). The report is written
//! *before* the delete (log-before-mutate), so a crash or store failure
//! after logging still leaves a durable record of intent, recoverable with
//! the replay entry point. Nothing is deleted until the full plan and log
//! are complete, so an interrupted run leaves the store unmodified.
//!
//! There is no partial or resumable state within a run; a crash mid-run
//! means restarting from the top, which is idempotent.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;

use crate::cluster::cluster_edges;
use crate::compare::find_edges;
use crate::config::Config;
use crate::errors::EngineError;
use crate::models::DeduplicationPlan;
use crate::plan::build_plan;
use crate::progress::{ProgressMode, ProgressReporter};
use crate::report::{build_report, load_report, replay_deletions, write_report, RunMode};
use crate::similarity::DedupeParams;
use crate::store::sqlite::SqliteStore;
use crate::store::RecordStore;

/// Inputs for one reconciliation run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Edge threshold in `(0, 1]`.
    pub threshold: f64,
    pub mode: RunMode,
    /// Directory the audit report is written to.
    pub report_dir: PathBuf,
    pub params: DedupeParams,
}

/// What a run did, for summaries and assertions.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mode: RunMode,
    pub threshold: f64,
    pub records: usize,
    pub cluster_count: usize,
    pub total_kept: usize,
    pub total_deleted: usize,
    pub report_path: PathBuf,
    /// Rows actually removed from the store (0 in dry-run).
    pub deleted_rows: u64,
}

/// What a replay did.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub report_path: PathBuf,
    /// Ids extracted from the report, in report order.
    pub ids: Vec<String>,
    /// Rows actually removed (0 when not executing).
    pub deleted_rows: u64,
}

/// Run the full pipeline against `store`.
///
/// Fewer than 2 records is a no-op success: the plan is empty but the
/// report is still written with `cluster_count: 0`.
pub async fn run<S: RecordStore + ?Sized>(
    store: &S,
    options: &RunOptions,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    if !(options.threshold > 0.0 && options.threshold <= 1.0) {
        return Err(EngineError::InvalidThreshold {
            value: options.threshold,
        });
    }

    let records = store
        .fetch_records()
        .await
        .map_err(|cause| EngineError::StoreRead { cause })?;

    let plan = if records.len() < 2 {
        DeduplicationPlan::default()
    } else {
        let edges = find_edges(&records, options.threshold, &options.params, reporter);
        let clusters = cluster_edges(records.len(), &edges);
        build_plan(&records, &clusters, &options.params)
    };

    let generated_at = Utc::now();
    let report = build_report(
        &records,
        &plan,
        options.mode,
        options.threshold,
        generated_at,
    );
    let report_path = write_report(&report, &options.report_dir, generated_at)?;

    let ids: Vec<String> = plan
        .clusters
        .iter()
        .flat_map(|cluster| cluster.deletions.iter())
        .map(|deletion| records[deletion.index].id.clone())
        .collect();

    let deleted_rows = if options.mode == RunMode::Execute && !ids.is_empty() {
        store
            .delete_records(&ids)
            .await
            .map_err(|cause| EngineError::StoreWrite {
                report: report_path.clone(),
                cause,
            })?
    } else {
        0
    };

    Ok(RunOutcome {
        mode: options.mode,
        threshold: options.threshold,
        records: records.len(),
        cluster_count: report.cluster_count,
        total_kept: report.total_kept,
        total_deleted: report.total_deleted,
        report_path,
        deleted_rows,
    })
}

/// Replay a previously written report: extract the deleted ids and, when
/// `execute` is set, issue the same batched delete.
///
/// Skips comparison, clustering, and planning entirely; the report is the
/// source of truth. The report file already exists, so this is
/// delete-after-existing-log.
pub async fn replay<S: RecordStore + ?Sized>(
    store: &S,
    report_path: &Path,
    execute: bool,
) -> Result<ReplayOutcome, EngineError> {
    let report = load_report(report_path)?;
    let ids = replay_deletions(&report);

    let deleted_rows = if execute && !ids.is_empty() {
        store
            .delete_records(&ids)
            .await
            .map_err(|cause| EngineError::StoreWrite {
                report: report_path.to_path_buf(),
                cause,
            })?
    } else {
        0
    };

    Ok(ReplayOutcome {
        report_path: report_path.to_path_buf(),
        ids,
        deleted_rows,
    })
}

/// `pdd dedupe`: run against the configured SQLite store and print a
/// summary.
pub async fn run_dedupe(
    config: &Config,
    threshold: Option<f64>,
    execute: bool,
    progress: ProgressMode,
) -> Result<()> {
    let options = RunOptions {
        threshold: threshold.unwrap_or(config.dedupe.threshold),
        mode: if execute {
            RunMode::Execute
        } else {
            RunMode::DryRun
        },
        report_dir: config.reports.dir.clone(),
        params: config.dedupe.params(),
    };

    let store = SqliteStore::connect(config).await?;
    let reporter = progress.reporter();
    let outcome = run(&store, &options, reporter.as_ref()).await?;
    store.close().await;

    let mode_label = match outcome.mode {
        RunMode::DryRun => "dry-run",
        RunMode::Execute => "execute",
    };
    println!("dedupe ({})", mode_label);
    println!("  threshold: {}", outcome.threshold);
    println!("  records: {}", outcome.records);
    println!("  clusters: {}", outcome.cluster_count);
    println!("  kept: {}", outcome.total_kept);
    println!("  marked for deletion: {}", outcome.total_deleted);
    if outcome.mode == RunMode::Execute {
        println!("  deleted: {}", outcome.deleted_rows);
    }
    println!("  report: {}", outcome.report_path.display());
    println!("ok");

    Ok(())
}

/// `pdd replay`: extract a report's deletion list; apply it when `--execute`.
pub async fn run_replay(config: &Config, report_path: &Path, execute: bool) -> Result<()> {
    let store = SqliteStore::connect(config).await?;
    let outcome = replay(&store, report_path, execute).await?;
    store.close().await;

    let mode_label = if execute { "execute" } else { "dry-run" };
    println!("replay {} ({})", outcome.report_path.display(), mode_label);
    println!("  deletions in report: {}", outcome.ids.len());
    if execute {
        println!("  deleted: {}", outcome.deleted_rows);
    } else {
        for id in &outcome.ids {
            println!("  {}", id);
        }
    }
    println!("ok");

    Ok(())
}
