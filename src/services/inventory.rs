//! Bucket inventory aggregation.
//!
//! Walks a paginated object listing to exhaustion and derives two views from
//! the result: a flat per-object listing and a per-folder size summary.
//! Only `list_all` performs I/O (through a [`PageFetcher`]); the rest is pure.

use crate::{
    models::{
        object::{FileView, ObjectRecord},
        summary::{BucketSummary, FolderStat},
    },
    services::public_url::PublicUrl,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, info};

/// One page of a storage listing.
#[derive(Clone, Debug, Default)]
pub struct ObjectPage {
    pub objects: Vec<ObjectRecord>,
    /// Cursor for the following page; `None` once the listing is exhausted.
    pub next_token: Option<String>,
}

/// Source of listing pages, implemented by the object-storage client.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page that starts at `continuation_token`, or the first page
    /// when it is `None`.
    async fn fetch_page(&self, continuation_token: Option<&str>) -> anyhow::Result<ObjectPage>;

    /// Cheap reachability check used by the readiness probe.
    async fn probe(&self) -> anyhow::Result<()> {
        self.fetch_page(None).await.map(|_| ())
    }
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("object storage unavailable while fetching listing page {page}")]
    StorageUnavailable {
        page: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Fetch every object in the bucket, following continuation tokens until the
/// store reports no further pages.
///
/// Pages are requested one at a time, in order. A failure on any page aborts
/// the listing; objects gathered from earlier pages are discarded.
pub async fn list_all(fetcher: &dyn PageFetcher) -> Result<Vec<ObjectRecord>, InventoryError> {
    let mut objects = Vec::new();
    let mut token: Option<String> = None;
    let mut page = 0usize;

    loop {
        debug!(page, token = ?token, "fetching listing page");
        let batch = fetcher
            .fetch_page(token.as_deref())
            .await
            .map_err(|source| {
                let detail = format!("{source:#}");
                error!(page, error = %detail, "listing page fetch failed");
                InventoryError::StorageUnavailable { page, source }
            })?;

        objects.extend(batch.objects);
        page += 1;

        match batch.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    info!(pages = page, objects = objects.len(), "bucket listing complete");
    Ok(objects)
}

/// Flatten records into the per-object view.
///
/// Missing fields are defaulted: size to 0, last-modified to `now`, etag to
/// an empty string.
pub fn to_file_views(
    objects: &[ObjectRecord],
    urls: &PublicUrl,
    now: DateTime<Utc>,
) -> Vec<FileView> {
    objects
        .iter()
        .map(|obj| FileView {
            key: obj.key.clone(),
            filename: obj.filename().to_string(),
            folder: obj.folder().to_string(),
            size: obj.size.unwrap_or(0),
            last_modified: obj.last_modified.unwrap_or(now),
            url: urls.object_url(&obj.key),
            etag: obj.etag.clone().unwrap_or_default(),
        })
        .collect()
}

/// Total count and size, plus a per-folder breakdown sorted by size
/// descending. Folders of equal size keep the order they were first seen in.
pub fn summarize(objects: &[ObjectRecord]) -> BucketSummary {
    let mut total_files = 0u64;
    let mut total_size = 0u64;
    let mut folders: Vec<(String, u64, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for obj in objects {
        let size = obj.size.unwrap_or(0);
        total_files += 1;
        total_size = total_size.saturating_add(size);

        let folder = obj.folder();
        let slot = *index.entry(folder).or_insert_with(|| {
            folders.push((folder.to_string(), 0, 0));
            folders.len() - 1
        });
        folders[slot].1 += 1;
        folders[slot].2 = folders[slot].2.saturating_add(size);
    }

    // `sort_by` is stable, which keeps equal-size folders in encounter order.
    folders.sort_by(|a, b| b.2.cmp(&a.2));

    let folder_breakdown = folders
        .into_iter()
        .map(|(folder, count, size)| FolderStat {
            folder,
            count,
            size,
            size_formatted: format_bytes(size),
        })
        .collect();

    BucketSummary {
        total_files,
        total_size,
        total_size_formatted: format_bytes(total_size),
        folder_breakdown,
    }
}

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with base-1024 units and two decimals,
/// e.g. `1536` → `"1.50 KB"`. Anything past TB is still shown in TB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{:.2} {}", scaled, SIZE_UNITS[exp])
}
