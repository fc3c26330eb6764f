//! Audit report: the durable, self-describing record of a run.
//!
//! The write path serializes the deletion plan together with run metadata
//! and per-member similarity-to-keeper scores. The report is self-contained:
//! everything needed to redo the deletion later is embedded, including a
//! snapshot of each keeper for human review without re-querying the store.
//!
//! The replay path is a literal extraction: given only a previously written
//! report, return the ids marked `deleted: true` with zero recomputation.
//! An operator may hand-edit a report to exclude specific ids before
//! applying it; replay never reconciles or "fixes up" such edits.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::{DeduplicationPlan, Record};

/// Current report format version. Bumped on breaking shape changes.
pub const REPORT_VERSION: u32 = 1;

/// Run mode recorded in the report and steering the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    DryRun,
    Execute,
}

/// One member row of a cluster: enough to audit and to replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMember {
    pub id: String,
    pub title_snapshot: String,
    /// Similarity to the cluster keeper; the keeper's own row records 1.0.
    pub similarity_to_keeper: f64,
    pub deleted: bool,
}

/// Keeper content at decision time, for review without the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperSnapshot {
    pub title: String,
    pub body: String,
    pub updated_at: i64,
}

/// One multi-member cluster: keeper identity, snapshot, and all members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCluster {
    pub keeper_id: String,
    pub keeper: KeeperSnapshot,
    pub members: Vec<ReportMember>,
}

/// The full audit document written once at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub version: u32,
    /// RFC 3339 run timestamp.
    pub generated_at: String,
    pub mode: RunMode,
    pub threshold: f64,
    pub cluster_count: usize,
    pub total_kept: usize,
    pub total_deleted: usize,
    pub clusters: Vec<ReportCluster>,
}

/// Assemble the report from the plan and run metadata.
///
/// The keeper appears as the first member of each cluster with
/// `similarity_to_keeper: 1.0` and `deleted: false`.
pub fn build_report(
    records: &[Record],
    plan: &DeduplicationPlan,
    mode: RunMode,
    threshold: f64,
    generated_at: DateTime<Utc>,
) -> AuditReport {
    let clusters: Vec<ReportCluster> = plan
        .clusters
        .iter()
        .map(|cluster| {
            let keeper = &records[cluster.keeper];
            let mut members = Vec::with_capacity(cluster.deletions.len() + 1);
            members.push(ReportMember {
                id: keeper.id.clone(),
                title_snapshot: keeper.title.clone(),
                similarity_to_keeper: 1.0,
                deleted: false,
            });
            for deletion in &cluster.deletions {
                let member = &records[deletion.index];
                members.push(ReportMember {
                    id: member.id.clone(),
                    title_snapshot: member.title.clone(),
                    similarity_to_keeper: deletion.similarity_to_keeper,
                    deleted: true,
                });
            }
            ReportCluster {
                keeper_id: keeper.id.clone(),
                keeper: KeeperSnapshot {
                    title: keeper.title.clone(),
                    body: keeper.body.clone(),
                    updated_at: keeper.updated_at,
                },
                members,
            }
        })
        .collect();

    AuditReport {
        version: REPORT_VERSION,
        generated_at: generated_at.to_rfc3339(),
        mode,
        threshold,
        cluster_count: clusters.len(),
        total_kept: clusters.len(),
        total_deleted: plan.total_deleted(),
        clusters,
    }
}

/// File name with the embedded run timestamp: `dedupe-YYYYMMDD-HHMMSS.json`.
pub fn report_filename(at: DateTime<Utc>) -> String {
    format!("dedupe-{}.json", at.format("%Y%m%d-%H%M%S"))
}

/// Write the report under `dir`, creating the directory if needed.
///
/// Returns the path written. Pretty-printed JSON so hand review and
/// hand-editing stay practical.
pub fn write_report(
    report: &AuditReport,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, EngineError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|source| EngineError::ReportSerialize { source })?;

    let path = dir.join(report_filename(at));
    std::fs::create_dir_all(dir).map_err(|source| EngineError::ReportWrite {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(|source| EngineError::ReportWrite {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Load and validate a previously written report. Strict: a missing file,
/// malformed JSON, or an unsupported version is fatal with no partial
/// extraction.
pub fn load_report(path: &Path) -> Result<AuditReport, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::ReportRead {
        path: path.to_path_buf(),
        source,
    })?;

    let report: AuditReport =
        serde_json::from_str(&content).map_err(|source| EngineError::ReportParse {
            path: path.to_path_buf(),
            source,
        })?;

    if report.version != REPORT_VERSION {
        return Err(EngineError::ReportVersion {
            path: path.to_path_buf(),
            found: report.version,
            expected: REPORT_VERSION,
        });
    }

    Ok(report)
}

/// Flat list of all ids marked `deleted: true`, in report order.
///
/// Pure extraction: no similarity computation, no store access, and no
/// reconciliation of hand-edited rows.
pub fn replay_deletions(report: &AuditReport) -> Vec<String> {
    report
        .clusters
        .iter()
        .flat_map(|cluster| cluster.members.iter())
        .filter(|member| member.deleted)
        .map(|member| member.id.clone())
        .collect()
}
