//! Core data types that flow through the reconciliation pipeline.
//!
//! A run operates on an immutable snapshot of [`Record`]s fetched once from
//! the store. Edges, clusters, and plans refer to records by their index in
//! that snapshot (arena representation); ids are resolved back only at the
//! report boundary.

/// A snapshot of one stored prompt, the unit under comparison.
///
/// `id` is unique within any input set passed to the engine in one run.
/// Records are never mutated in place, only referenced or deleted by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    /// Short text, may be empty.
    pub title: String,
    /// Long free text, may be empty.
    pub body: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds; drives survivor selection.
    pub updated_at: i64,
    /// SHA-256 hex over the normalized title and body. Equal fingerprints
    /// short-circuit the pairwise comparison to an exact match.
    pub fingerprint: String,
}

/// An undirected similarity relation between two records in a run snapshot.
///
/// `a` and `b` index the run's record slice. An edge exists only when
/// `score >= threshold`; sub-threshold pairs are never materialized.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEdge {
    pub a: usize,
    pub b: usize,
    /// Composite record similarity in `[0, 1]`.
    pub score: f64,
}

/// A record marked for deletion, with its similarity to the cluster keeper.
///
/// The recorded score is always measured against the keeper, even when the
/// member joined the cluster transitively through a different record.
#[derive(Debug, Clone, Copy)]
pub struct PlannedDeletion {
    pub index: usize,
    pub similarity_to_keeper: f64,
}

/// Keeper plus deletion candidates for one multi-member cluster.
///
/// The keeper never appears in its own deletion list.
#[derive(Debug, Clone)]
pub struct ClusterPlan {
    pub keeper: usize,
    pub deletions: Vec<PlannedDeletion>,
}

/// The decision artifact for a run: one entry per multi-member cluster.
///
/// Built once by survivor selection and immutable afterward. Singleton
/// clusters produce no entry.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationPlan {
    pub clusters: Vec<ClusterPlan>,
}

impl DeduplicationPlan {
    /// Total number of records marked for deletion across all clusters.
    pub fn total_deleted(&self) -> usize {
        self.clusters.iter().map(|c| c.deletions.len()).sum()
    }
}
