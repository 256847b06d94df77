// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::crawler::{CrawlRequest, CrawlResult};
use crate::models::version::{HealthResponse, VersionResponse};
use crate::services::config::load_config;
use crate::services::pipeline::Pipeline;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SEO_CRAWLER_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SEO_CRAWLER_VERSION");

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Directory holding `<env>.ini` files
    pub config_dir: PathBuf,
}

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "seo-crawler".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Crawl one URL and return its metadata, classification and topics.
///
/// Crawl failures are reported inside the result with a 200 status; only an
/// unusable environment is rejected with 400.
pub async fn crawl_handler(
    State(state): State<AppState>,
    Json(payload): Json<CrawlRequest>,
) -> Result<Json<CrawlResult>, (StatusCode, String)> {
    info!(
        "Received request: {} [env={}, statistical={}]",
        payload.url, payload.env, payload.use_statistical
    );

    let config = load_config(&payload.env, &state.config_dir)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Configuration error: {e}")))?;

    let result = state
        .pipeline
        .process(&payload.url, &config, payload.use_statistical)
        .await;

    if result.is_error() {
        warn!("Failed to process {}: {}", payload.url, result.error);
    } else {
        info!("Successfully processed {}", payload.url);
    }

    Ok(Json(result))
}

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", post(crawl_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}
