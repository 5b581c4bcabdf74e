//! Denylist promoter for the IP denylist service.
//!
//! Scans the counter store and writes every address whose hit count exceeds
//! the threshold into the denylist store. Counters are never reset after
//! promotion, so a qualifying address is re-promoted with a fresh timestamp
//! on every subsequent scan.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info};
use thiserror::Error;

use super::store::{CounterStore, DenylistStore, StoreError};

/// Errors that can occur during a promotion pass
#[derive(Error, Debug)]
pub enum PromotionError {
    #[error("Error scanning counter store: {0}")]
    Scan(#[source] StoreError),
}

/// Promotion service over injected counter and denylist stores.
#[derive(Clone)]
pub struct Promoter {
    counters: Arc<dyn CounterStore>,
    denylist: Arc<dyn DenylistStore>,
}

impl Promoter {
    /// Create a new promoter
    pub fn new(counters: Arc<dyn CounterStore>, denylist: Arc<dyn DenylistStore>) -> Self {
        Self { counters, denylist }
    }

    /// Promote every address whose hit count exceeds `threshold` (strict).
    ///
    /// A scan failure aborts the whole pass. A put failure for one address
    /// is logged and the remaining addresses are still attempted. Returns
    /// the addresses written to the denylist by this pass.
    pub async fn promote_exceeding(&self, threshold: u64) -> Result<Vec<String>, PromotionError> {
        let records = self
            .counters
            .scan_exceeding(threshold)
            .await
            .map_err(PromotionError::Scan)?;

        let mut promoted = Vec::with_capacity(records.len());
        for record in records {
            let promoted_at = Utc::now().to_rfc3339();
            match self.denylist.put(&record.address, &promoted_at).await {
                Ok(()) => {
                    info!(
                        "Added {} to denied list (hit count {})",
                        record.address, record.hit_count
                    );
                    promoted.push(record.address);
                }
                Err(e) => {
                    error!("Error adding {} to denied list: {}", record.address, e);
                }
            }
        }
        Ok(promoted)
    }
}
