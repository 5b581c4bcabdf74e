//! Configuration management for the IP denylist service.
//!
//! This module handles loading and managing application configuration
//! from environment variables and configuration files.

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use std::env;

use crate::models::Config;

/// Load configuration from the config file and environment variables
pub fn load_config() -> Result<Config, ConfigError> {
    let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config/default.toml".to_string());

    let config = ConfigBuilder::builder()
        .add_source(File::with_name(&config_file).required(false))
        .add_source(Environment::default().separator("__"))
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("redis.url", "redis://127.0.0.1:6379")?
        .set_default("redis.pool_size", 10)?
        .set_default("store.counter_namespace", "ip_count")?
        .set_default("store.denylist_namespace", "denied_ip")?
        .set_default("detection.hit_threshold", 10)?
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = load_config().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.counter_namespace, "ip_count");
        assert_eq!(config.store.denylist_namespace, "denied_ip");
        assert_eq!(config.detection.hit_threshold, 10);
    }
}
