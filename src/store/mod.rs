//! Storage abstraction for the reconciliation engine.
//!
//! The [`RecordStore`] trait is the engine's only view of persistence: one
//! bulk read at the start of a run, and at most one batched delete at the
//! end. There are no per-record round trips.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Record;

/// Abstract record store.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch_records`](RecordStore::fetch_records) | Snapshot all records in scope |
/// | [`delete_records`](RecordStore::delete_records) | Delete a full id set in one batch |
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all records in scope as a read-only snapshot.
    ///
    /// Field validation happens here, at the adapter boundary: rows missing
    /// title or body surface as empty strings, never as nulls deeper in the
    /// pipeline.
    async fn fetch_records(&self) -> Result<Vec<Record>>;

    /// Delete records by id set, called at most once per run with the full
    /// deletion list.
    ///
    /// The batch must be atomic enough that a partial failure is detectable
    /// as a whole-batch failure. Returns the number of records removed.
    async fn delete_records(&self, ids: &[String]) -> Result<u64>;
}
