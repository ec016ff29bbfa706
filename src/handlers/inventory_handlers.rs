//! HTTP handlers for the bucket inventory.
//! Each request lists the whole bucket afresh and delegates the aggregation
//! to `InventoryService`.

use crate::{
    errors::AppError,
    models::{object::FileView, summary::BucketStats},
    services::inventory_service::InventoryService,
};
use axum::{Json, extract::State};
use serde::Serialize;

/// `{ "status": "success", "data": ... }` envelope used by every endpoint.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            data,
        })
    }
}

/// `GET /files`: every object in the bucket as a flat list.
#[tracing::instrument(name = "List files", skip(service))]
pub async fn list_files(
    State(service): State<InventoryService>,
) -> Result<Json<Success<Vec<FileView>>>, AppError> {
    let files = service.list_files().await.map_err(|err| {
        AppError::from_inventory(err, "Failed to fetch files from storage", service.expose_errors)
    })?;
    Ok(Success::new(files))
}

/// `GET /stats`: totals and per-folder breakdown, largest folder first.
#[tracing::instrument(name = "Bucket stats", skip(service))]
pub async fn bucket_stats(
    State(service): State<InventoryService>,
) -> Result<Json<Success<BucketStats>>, AppError> {
    let stats = service.bucket_stats().await.map_err(|err| {
        AppError::from_inventory(err, "Failed to fetch bucket statistics", service.expose_errors)
    })?;
    Ok(Success::new(stats))
}
