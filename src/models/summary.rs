//! Aggregated bucket statistics served by `GET /stats`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Object count and total bytes for one top-level folder.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FolderStat {
    pub folder: String,
    pub count: u64,
    pub size: u64,
    pub size_formatted: String,
}

/// Totals over a whole listing plus the per-folder breakdown,
/// largest folder first.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub total_files: u64,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub folder_breakdown: Vec<FolderStat>,
}

/// A [`BucketSummary`] stamped with the time it was computed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    #[serde(flatten)]
    pub summary: BucketSummary,
    pub last_updated: DateTime<Utc>,
}
