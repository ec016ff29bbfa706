//! Represents an object (file) listed from a bucket, and the flattened view
//! returned to the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Folder name used for keys that have no `/` in them.
pub const ROOT_FOLDER: &str = "root";

/// A single object as reported by the storage listing.
///
/// The listing may omit any field except the key, so everything else is
/// optional here and filled in when the object is turned into a [`FileView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Object key (path-like identifier within the bucket, `/`-delimited).
    pub key: String,

    /// Size in bytes.
    pub size: Option<u64>,

    /// Timestamp when the object was last modified.
    pub last_modified: Option<DateTime<Utc>>,

    /// Opaque content hash reported by the store.
    pub etag: Option<String>,
}

impl ObjectRecord {
    /// Top-level folder of the key, or [`ROOT_FOLDER`] for keys without a `/`.
    ///
    /// Never empty: a key starting with `/` also lands in [`ROOT_FOLDER`].
    pub fn folder(&self) -> &str {
        match self.key.split_once('/') {
            Some((first, _)) if !first.is_empty() => first,
            _ => ROOT_FOLDER,
        }
    }

    /// Final path segment of the key.
    pub fn filename(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Flattened per-object view served by `GET /files`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub key: String,
    pub filename: String,
    pub folder: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub url: String,
    pub etag: String,
}

#[cfg(test)]
impl ObjectRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            last_modified: None,
            etag: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
