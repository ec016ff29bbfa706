//! Defines routes for the bucket inventory API.
//!
//! ## Structure
//! - `GET /files`: flat listing of every object in the bucket
//! - `GET /stats`: totals and per-folder breakdown
//! - `GET /healthz`: liveness
//! - `GET /readyz`: readiness (storage reachable)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        inventory_handlers::{bucket_stats, list_files},
    },
    services::inventory_service::InventoryService,
};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build and return the router for all inventory routes.
///
/// The router carries shared state (`InventoryService`) to all handlers.
pub fn routes() -> Router<InventoryService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Inventory routes
        .route("/files", get(list_files))
        .route("/stats", get(bucket_stats))
}

/// CORS policy for the dashboard origins; `None` when no origin is configured.
/// A single `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin `{}`", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET])
            .allow_headers(Any),
    ))
}
