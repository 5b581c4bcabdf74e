//! IP Denylist Service
//!
//! Rate-based abuse detection: tallies per-source-address hit counts from
//! web-server access logs and promotes addresses that exceed a hit threshold
//! into a persistent denylist, consumed by a downstream enforcement point.

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
