use serde::{Deserialize, Serialize};

use crate::core::DetectionConfig;

/// One unit of inbound log delivery, wrapping a JSON-encoded access-log
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEnvelope {
    /// JSON-encoded log record body.
    pub message: String,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,
    /// Redis connection pool size
    pub pool_size: u32,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key namespace of the per-address hit counter store
    pub counter_namespace: String,
    /// Key namespace of the denied-address store
    pub denylist_namespace: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Redis configuration
    pub redis: RedisConfig,
    /// Store configuration
    pub store: StoreConfig,
    /// Abuse detection configuration
    pub detection: DetectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            redis: RedisConfig {
                url: "redis://127.0.0.1:6379".to_string(),
                pool_size: 10,
            },
            store: StoreConfig {
                counter_namespace: "ip_count".to_string(),
                denylist_namespace: "denied_ip".to_string(),
            },
            detection: DetectionConfig::default(),
        }
    }
}
