//! Core functionality for the IP denylist service.
//!
//! This module contains the core components of the service: the store ports
//! with their Redis and in-memory implementations, the ingest/tally step,
//! and the denylist promoter.

pub mod memory;
pub mod promoter;
pub mod store;
pub mod tally;

use serde::{Deserialize, Serialize};

/// Abuse detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Hit count above which an address is promoted to the denylist
    pub hit_threshold: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { hit_threshold: 10 }
    }
}

pub use memory::{MemoryCounterStore, MemoryDenylistStore};
pub use promoter::{Promoter, PromotionError};
pub use store::{
    CounterRecord, CounterStore, DenylistRecord, DenylistStore, RedisCounterStore,
    RedisDenylistStore, StoreError,
};
pub use tally::{IngestError, Tally};
