//! InventoryService: request-scoped bucket inventory over a shared
//! `PageFetcher`. Holds no per-request state; every call lists the bucket
//! from scratch.

use crate::{
    models::{object::FileView, summary::BucketStats},
    services::{
        inventory::{self, InventoryError, PageFetcher},
        public_url::PublicUrl,
    },
};
use chrono::Utc;
use std::sync::Arc;

/// Shared axum state for the inventory endpoints.
#[derive(Clone)]
pub struct InventoryService {
    /// Storage collaborator used to enumerate the bucket.
    pub fetcher: Arc<dyn PageFetcher>,

    /// Base for the public object URLs in `GET /files`.
    pub urls: PublicUrl,

    /// Whether error responses may include the underlying error text.
    pub expose_errors: bool,
}

impl InventoryService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, urls: PublicUrl, expose_errors: bool) -> Self {
        Self {
            fetcher,
            urls,
            expose_errors,
        }
    }

    /// Every object in the bucket as a flat file listing.
    pub async fn list_files(&self) -> Result<Vec<FileView>, InventoryError> {
        let objects = inventory::list_all(self.fetcher.as_ref()).await?;
        Ok(inventory::to_file_views(&objects, &self.urls, Utc::now()))
    }

    /// Totals and per-folder breakdown for the bucket.
    pub async fn bucket_stats(&self) -> Result<BucketStats, InventoryError> {
        let objects = inventory::list_all(self.fetcher.as_ref()).await?;
        Ok(BucketStats {
            summary: inventory::summarize(&objects),
            last_updated: Utc::now(),
        })
    }
}
