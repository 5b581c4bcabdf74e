//! Store ports for the IP denylist service.
//!
//! This module defines the counter-store and denylist-store contracts and
//! their Redis-backed implementations. The stores are injected as trait
//! objects so tests can substitute in-memory fakes.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::format_store_key;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Per-address hit counter record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    /// Source address, the record key
    pub address: String,
    /// Total observations since the record was first created
    pub hit_count: u64,
    /// Timestamp of the most recent observation, carried through unparsed
    pub last_seen: String,
}

/// Denied-address record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenylistRecord {
    /// Source address, the record key
    pub address: String,
    /// Wall-clock time of the promotion decision, RFC 3339
    pub promoted_at: String,
}

/// Port for the per-address hit counter store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the hit count for `address` by 1 and overwrite
    /// its last-seen timestamp, creating the record if absent.
    async fn observe(&self, address: &str, timestamp: &str) -> Result<(), StoreError>;

    /// Return every counter record with `hit_count > threshold` (strict).
    async fn scan_exceeding(&self, threshold: u64) -> Result<Vec<CounterRecord>, StoreError>;

    /// Point lookup, used by tests and downstream consumers.
    async fn get(&self, address: &str) -> Result<Option<CounterRecord>, StoreError>;
}

/// Port for the denied-address store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DenylistStore: Send + Sync {
    /// Unconditional upsert of a denylist record.
    async fn put(&self, address: &str, promoted_at: &str) -> Result<(), StoreError>;

    /// Point lookup, used by tests and downstream consumers.
    async fn get(&self, address: &str) -> Result<Option<DenylistRecord>, StoreError>;
}

/// Counter store backed by Redis.
///
/// Hit counts live in a sorted set keyed `{namespace}:hits` (member =
/// address, score = count) so the promotion scan filters server-side with
/// `ZRANGEBYSCORE`. Last-seen timestamps live in a companion hash keyed
/// `{namespace}:last_seen`. Both writes of an observation go through one
/// MULTI/EXEC pipeline.
pub struct RedisCounterStore {
    /// Redis client
    client: redis::Client,
    /// Key namespace naming this counter store instance
    namespace: String,
}

impl RedisCounterStore {
    /// Create a new Redis-backed counter store
    pub fn new(client: redis::Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    fn hits_key(&self) -> String {
        format_store_key(&self.namespace, "hits")
    }

    fn last_seen_key(&self) -> String {
        format_store_key(&self.namespace, "last_seen")
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn observe(&self, address: &str, timestamp: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        redis::pipe()
            .atomic()
            .zincr(self.hits_key(), address, 1u64)
            .ignore()
            .hset(self.last_seen_key(), address, timestamp)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn scan_exceeding(&self, threshold: u64) -> Result<Vec<CounterRecord>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        // Exclusive lower bound: hit_count > threshold, never >=.
        let rows: Vec<(String, u64)> = conn
            .zrangebyscore_withscores(self.hits_key(), format!("({}", threshold), "+inf")
            .await?;
        let mut records = Vec::with_capacity(rows.len());
        for (address, hit_count) in rows {
            let last_seen: Option<String> = conn.hget(self.last_seen_key(), &address).await?;
            records.push(CounterRecord {
                address,
                hit_count,
                last_seen: last_seen.unwrap_or_default(),
            });
        }
        Ok(records)
    }

    async fn get(&self, address: &str) -> Result<Option<CounterRecord>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let hit_count: Option<u64> = conn.zscore(self.hits_key(), address).await?;
        let Some(hit_count) = hit_count else {
            return Ok(None);
        };
        let last_seen: Option<String> = conn.hget(self.last_seen_key(), address).await?;
        Ok(Some(CounterRecord {
            address: address.to_string(),
            hit_count,
            last_seen: last_seen.unwrap_or_default(),
        }))
    }
}

/// Denylist store backed by Redis.
///
/// One hash keyed by the configured namespace: field = address, value =
/// promotion timestamp.
pub struct RedisDenylistStore {
    /// Redis client
    client: redis::Client,
    /// Key naming this denylist store instance
    namespace: String,
}

impl RedisDenylistStore {
    /// Create a new Redis-backed denylist store
    pub fn new(client: redis::Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl DenylistStore for RedisDenylistStore {
    async fn put(&self, address: &str, promoted_at: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let _: () = conn.hset(&self.namespace, address, promoted_at).await?;
        Ok(())
    }

    async fn get(&self, address: &str) -> Result<Option<DenylistRecord>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let promoted_at: Option<String> = conn.hget(&self.namespace, address).await?;
        Ok(promoted_at.map(|promoted_at| DenylistRecord {
            address: address.to_string(),
            promoted_at,
        }))
    }
}
