//! IP Denylist Service
//!
//! This is the main entry point for the IP denylist service.
//! It wires the Redis-backed stores into the tally and promoter services
//! and starts the web server.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use redis::Client;
use std::sync::Arc;

use ip_denylist_service::api::{self, ApiState};
use ip_denylist_service::config;
use ip_denylist_service::core::{Promoter, RedisCounterStore, RedisDenylistStore, Tally};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    info!("Starting IP Denylist Service...");

    // Load configuration
    let config = config::load_config().context("Failed to load configuration")?;
    let config = Arc::new(config);

    // Initialize Redis client
    let redis_client =
        Client::open(config.redis.url.as_str()).context("Failed to create Redis client")?;

    // Wire the stores into the tally and promoter services
    let counters: Arc<RedisCounterStore> = Arc::new(RedisCounterStore::new(
        redis_client.clone(),
        config.store.counter_namespace.clone(),
    ));
    let denylist = Arc::new(RedisDenylistStore::new(
        redis_client,
        config.store.denylist_namespace.clone(),
    ));

    // Create API state
    let state = web::Data::new(ApiState {
        tally: Tally::new(counters.clone()),
        promoter: Promoter::new(counters, denylist),
        config: config.clone(),
    });

    // Start HTTP server
    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::config))
        .bind((config.server.host.as_str(), config.server.port))?
        .run()
        .await?;

    Ok(())
}
