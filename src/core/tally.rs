//! Ingest/tally step for the IP denylist service.
//!
//! Parses inbound access-log envelopes and applies one atomic observe per
//! record against the counter store. A malformed envelope aborts the whole
//! batch; a store failure on a single record is logged and skipped.

use std::sync::Arc;

use log::{debug, error};
use serde::Deserialize;
use thiserror::Error;

use super::store::{CounterStore, StoreError};
use crate::models::LogEnvelope;

/// Errors that can occur while ingesting a batch
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid log record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Log record carries an empty client IP")]
    EmptyAddress,
}

/// Parsed body of one access-log record.
#[derive(Debug, Deserialize)]
struct LogRecord {
    #[serde(rename = "httpRequest")]
    http_request: HttpRequestInfo,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct HttpRequestInfo {
    #[serde(rename = "clientIp")]
    client_ip: String,
}

/// Ingest/tally service over an injected counter store.
#[derive(Clone)]
pub struct Tally {
    counters: Arc<dyn CounterStore>,
}

impl Tally {
    /// Create a new tally service
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Record one observation of `address`.
    ///
    /// Increments the counter record's hit count by 1 and overwrites its
    /// last-seen timestamp, creating the record if absent. The timestamp is
    /// an opaque string carried through without parsing.
    pub async fn observe(&self, address: &str, timestamp: &str) -> Result<(), StoreError> {
        self.counters.observe(address, timestamp).await
    }

    /// Tally a batch of envelopes, strictly one at a time.
    ///
    /// A parse failure (invalid JSON, missing field, empty address) is fatal
    /// to the batch and propagates immediately; records tallied before the
    /// failure stay tallied. A store failure on one record is logged and the
    /// batch continues. Returns the number of records tallied.
    pub async fn process_batch(&self, envelopes: &[LogEnvelope]) -> Result<usize, IngestError> {
        let mut tallied = 0;
        for envelope in envelopes {
            let record: LogRecord = serde_json::from_str(&envelope.message)?;
            let address = record.http_request.client_ip;
            if address.is_empty() {
                return Err(IngestError::EmptyAddress);
            }
            match self.observe(&address, &record.timestamp).await {
                Ok(()) => {
                    debug!("IP count updated for {}", address);
                    tallied += 1;
                }
                Err(e) => {
                    error!("Error updating IP count for {}: {}", address, e);
                }
            }
        }
        Ok(tallied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryCounterStore;
    use crate::core::store::MockCounterStore;

    fn envelope(ip: &str, timestamp: &str) -> LogEnvelope {
        LogEnvelope {
            message: format!(
                r#"{{"httpRequest": {{"clientIp": "{}"}}, "timestamp": "{}"}}"#,
                ip, timestamp
            ),
        }
    }

    #[tokio::test]
    async fn test_batch_tallies_every_record() {
        let counters = Arc::new(MemoryCounterStore::new());
        let tally = Tally::new(counters.clone());

        let batch = vec![
            envelope("123.123.123.123", "2023-01-01T00:00:00Z"),
            envelope("123.123.123.123", "2023-01-01T00:00:01Z"),
            envelope("10.0.0.9", "2023-01-01T00:00:02Z"),
        ];
        let tallied = tally.process_batch(&batch).await.unwrap();
        assert_eq!(tallied, 3);

        let record = counters.get("123.123.123.123").await.unwrap().unwrap();
        assert_eq!(record.hit_count, 2);
        assert_eq!(record.last_seen, "2023-01-01T00:00:01Z");

        let record = counters.get("10.0.0.9").await.unwrap().unwrap();
        assert_eq!(record.hit_count, 1);
    }

    #[tokio::test]
    async fn test_invalid_json_aborts_batch() {
        let counters = Arc::new(MemoryCounterStore::new());
        let tally = Tally::new(counters.clone());

        let batch = vec![LogEnvelope {
            message: "Invalid JSON".to_string(),
        }];
        let result = tally.process_batch(&batch).await;
        assert!(matches!(result, Err(IngestError::Parse(_))));

        // Nothing was tallied.
        assert!(counters.scan_exceeding(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_before_parse_failure_stay_tallied() {
        let counters = Arc::new(MemoryCounterStore::new());
        let tally = Tally::new(counters.clone());

        let batch = vec![
            envelope("10.0.0.1", "2023-01-01T00:00:00Z"),
            LogEnvelope {
                message: r#"{"timestamp": "2023-01-01T00:00:01Z"}"#.to_string(),
            },
        ];
        assert!(tally.process_batch(&batch).await.is_err());

        let record = counters.get("10.0.0.1").await.unwrap().unwrap();
        assert_eq!(record.hit_count, 1);
    }

    #[tokio::test]
    async fn test_empty_client_ip_is_fatal() {
        let counters = Arc::new(MemoryCounterStore::new());
        let tally = Tally::new(counters);

        let batch = vec![envelope("", "2023-01-01T00:00:00Z")];
        let result = tally.process_batch(&batch).await;
        assert!(matches!(result, Err(IngestError::EmptyAddress)));
    }

    #[tokio::test]
    async fn test_store_failure_skips_record_and_continues() {
        let mut counters = MockCounterStore::new();
        counters
            .expect_observe()
            .times(2)
            .returning(|address, _timestamp| {
                if address == "10.0.0.1" {
                    Err(StoreError::Unavailable("connection refused".to_string()))
                } else {
                    Ok(())
                }
            });
        let tally = Tally::new(Arc::new(counters));

        let batch = vec![
            envelope("10.0.0.1", "2023-01-01T00:00:00Z"),
            envelope("10.0.0.2", "2023-01-01T00:00:01Z"),
        ];
        let tallied = tally.process_batch(&batch).await.unwrap();
        assert_eq!(tallied, 1);
    }
}
