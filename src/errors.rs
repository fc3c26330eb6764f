//! Fatal error kinds for a reconciliation run.
//!
//! Per-pair comparison failures are not represented here: they are contained
//! inside the comparator and degrade the offending pair to "no edge". Every
//! variant below terminates the run, and none are retried automatically:
//! re-running `pdd replay` against a written report is a manual operator
//! action.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Threshold outside `(0, 1]`, rejected before any comparison work.
    #[error("threshold must be in (0, 1], got {value}")]
    InvalidThreshold { value: f64 },

    /// The bulk record fetch failed.
    #[error("failed to read records from store: {cause}")]
    StoreRead { cause: anyhow::Error },

    /// The batched delete failed after the audit report was already written.
    ///
    /// The run is partially complete: logged but not deleted. The report is
    /// the source of truth for what should happen; recover with
    /// `pdd replay <report> --execute`.
    #[error(
        "delete failed after audit report was written to {0}; \
         recover with `pdd replay {0} --execute`: {1}",
        .report.display(),
        .cause
    )]
    StoreWrite {
        report: PathBuf,
        cause: anyhow::Error,
    },

    /// The audit report could not be serialized.
    #[error("failed to serialize audit report")]
    ReportSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// The audit report file could not be written. Nothing was deleted.
    #[error("failed to write audit report to {}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Replay was given a missing or unreadable report file.
    #[error("failed to read audit report {}", .path.display())]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Replay was given a malformed report file. No partial extraction.
    #[error("failed to parse audit report {}", .path.display())]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Replay was given a report written by an incompatible format version.
    #[error(
        "audit report {} has unsupported version {} (expected {})",
        .path.display(),
        .found,
        .expected
    )]
    ReportVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}
