//! In-memory [`RecordStore`] implementation for testing.
//!
//! Holds records behind a `std::sync::RwLock` and counts delete
//! invocations, so dry-run purity ("the delete endpoint is never invoked")
//! is directly assertable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Record;

use super::RecordStore;

/// In-memory store seeded with a fixed record set.
pub struct InMemoryStore {
    records: RwLock<Vec<Record>>,
    delete_calls: AtomicU64,
}

impl InMemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            delete_calls: AtomicU64::new(0),
        }
    }

    /// How many times `delete_records` has been invoked.
    pub fn delete_call_count(&self) -> u64 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Current number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the records still present, in storage order.
    pub fn remaining_ids(&self) -> Vec<String> {
        self.records
            .read()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_records(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().unwrap().clone())
    }

    async fn delete_records(&self, ids: &[String]) -> Result<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok((before - records.len()) as u64)
    }
}
