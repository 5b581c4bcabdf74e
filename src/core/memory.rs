//! In-memory store implementations.
//!
//! Drop-in substitutes for the Redis-backed stores, used by tests and
//! benches. All operations go through one mutex per store, which is enough
//! to give the same no-lost-update guarantee the Redis stores get from
//! atomic increments.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::store::{CounterRecord, CounterStore, DenylistRecord, DenylistStore, StoreError};

/// Counter store held in process memory.
#[derive(Default)]
pub struct MemoryCounterStore {
    records: Mutex<HashMap<String, CounterRecord>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a counter record, bypassing the observe path.
    pub fn seed(&self, address: &str, hit_count: u64, last_seen: &str) {
        let mut records = self.records.lock().unwrap();
        records.insert(
            address.to_string(),
            CounterRecord {
                address: address.to_string(),
                hit_count,
                last_seen: last_seen.to_string(),
            },
        );
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn observe(&self, address: &str, timestamp: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry(address.to_string())
            .or_insert_with(|| CounterRecord {
                address: address.to_string(),
                hit_count: 0,
                last_seen: String::new(),
            });
        record.hit_count += 1;
        record.last_seen = timestamp.to_string();
        Ok(())
    }

    async fn scan_exceeding(&self, threshold: u64) -> Result<Vec<CounterRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        let mut matching: Vec<CounterRecord> = records
            .values()
            .filter(|record| record.hit_count > threshold)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(matching)
    }

    async fn get(&self, address: &str) -> Result<Option<CounterRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(address).cloned())
    }
}

/// Denylist store held in process memory.
#[derive(Default)]
pub struct MemoryDenylistStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryDenylistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DenylistStore for MemoryDenylistStore {
    async fn put(&self, address: &str, promoted_at: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.insert(address.to_string(), promoted_at.to_string());
        Ok(())
    }

    async fn get(&self, address: &str) -> Result<Option<DenylistRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(address).map(|promoted_at| DenylistRecord {
            address: address.to_string(),
            promoted_at: promoted_at.clone(),
        }))
    }
}
