//! API endpoints for the IP denylist service.
//!
//! This module provides the HTTP surface of the service: a health check and
//! the batch-ingest endpoint that tallies a batch of access-log envelopes
//! and then runs a promotion pass.

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::core::{IngestError, Promoter, PromotionError, Tally};
use crate::models::{Config, LogEnvelope};

pub struct ApiState {
    pub tally: Tally,
    pub promoter: Promoter,
    pub config: Arc<Config>,
}

/// API configuration function for Actix-web
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(web::resource("/health").route(web::get().to(health_check)))
            .service(web::resource("/logs").route(web::post().to(process_logs))),
    );
}

/// Health check endpoint response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Batch-ingest request
#[derive(Debug, Serialize, Deserialize)]
pub struct LogBatchRequest {
    pub records: Vec<LogEnvelope>,
}

/// Batch-ingest response
#[derive(Serialize)]
struct ProcessResponse {
    message: String,
}

/// Failure of one invocation, split by phase.
///
/// Both variants map to the same 500 response; the split keeps the cause
/// visible in logs instead of collapsing it into one catch-all.
#[derive(Error, Debug)]
enum BatchError {
    #[error("Ingest failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("Promotion failed: {0}")]
    Promotion(#[from] PromotionError),
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Batch-ingest endpoint: tally every envelope, then run a promotion pass.
pub async fn process_logs(
    state: web::Data<ApiState>,
    req: web::Json<LogBatchRequest>,
) -> impl Responder {
    match run_batch(&state, &req.records).await {
        Ok(_) => HttpResponse::Ok().json(ProcessResponse {
            message: "IP addresses processed".to_string(),
        }),
        Err(e) => {
            error!("Error processing event records: {}", e);
            HttpResponse::InternalServerError().json(ProcessResponse {
                message: "Error processing logs".to_string(),
            })
        }
    }
}

async fn run_batch(state: &ApiState, records: &[LogEnvelope]) -> Result<Vec<String>, BatchError> {
    state.tally.process_batch(records).await?;
    let promoted = state
        .promoter
        .promote_exceeding(state.config.detection.hit_threshold)
        .await?;
    Ok(promoted)
}
