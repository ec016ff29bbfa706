//! `PageFetcher` backed by an S3-compatible endpoint (AWS, MinIO, ...).
//!
//! Uses path-style addressing against the configured endpoint with static
//! credentials, so no ambient AWS profile or IMDS lookup is involved.

use crate::{
    config::StorageConfig,
    models::object::ObjectRecord,
    services::inventory::{ObjectPage, PageFetcher},
};
use anyhow::{Context, bail};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Builder, Credentials, Region},
    operation::list_objects_v2::ListObjectsV2Output,
    primitives::DateTime as SdkDateTime,
    types::Object,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub struct S3PageFetcher {
    client: Client,
    bucket: String,
    page_size: i32,
}

impl S3PageFetcher {
    pub fn new(cfg: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            cfg.access_key.clone(),
            cfg.secret_key.clone(),
            None,
            None,
            "bucket-inventory-config",
        );
        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .endpoint_url(cfg.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: cfg.bucket.clone(),
            page_size: cfg.page_size as i32,
        }
    }
}

#[async_trait]
impl PageFetcher for S3PageFetcher {
    async fn fetch_page(&self, continuation_token: Option<&str>) -> anyhow::Result<ObjectPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(self.page_size)
            .set_continuation_token(continuation_token.map(str::to_string))
            .send()
            .await
            .with_context(|| format!("listing objects in bucket `{}`", self.bucket))?;

        let page = page_from_output(&output)?;
        debug!(
            bucket = %self.bucket,
            objects = page.objects.len(),
            truncated = page.next_token.is_some(),
            "received listing page"
        );
        Ok(page)
    }

    async fn probe(&self) -> anyhow::Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("checking bucket `{}`", self.bucket))?;
        Ok(())
    }
}

/// Convert one ListObjectsV2 response into a page.
///
/// The continuation token is only followed while the response says it is
/// truncated; an empty token counts as no token. A truncated response
/// without a token is malformed, since the rest of the bucket could not be
/// reached.
fn page_from_output(output: &ListObjectsV2Output) -> anyhow::Result<ObjectPage> {
    let token = output
        .next_continuation_token()
        .filter(|token| !token.is_empty())
        .map(str::to_string);
    let next_token = match output.is_truncated() {
        Some(false) => None,
        Some(true) if token.is_none() => {
            bail!("truncated listing page without a continuation token")
        }
        _ => token,
    };
    let objects = output.contents().iter().filter_map(record_from_sdk).collect();
    Ok(ObjectPage { objects, next_token })
}

fn record_from_sdk(obj: &Object) -> Option<ObjectRecord> {
    let Some(key) = obj.key() else {
        warn!("skipping listed object without a key");
        return None;
    };
    Some(ObjectRecord {
        key: key.to_string(),
        size: obj.size().map(|s| s.max(0) as u64),
        last_modified: obj.last_modified().and_then(to_chrono),
        etag: obj.e_tag().map(|e| e.trim_matches('"').to_string()),
    })
}

fn to_chrono(ts: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_object(key: &str, size: i64) -> Object {
        Object::builder()
            .key(key)
            .size(size)
            .e_tag("\"9e107d9d372bb6826bd81d3542a419d6\"")
            .last_modified(SdkDateTime::from_secs(1_700_000_000))
            .build()
    }

    #[test]
    fn converts_sdk_objects() {
        let record = record_from_sdk(&sdk_object("docs/a.pdf", 1024)).unwrap();
        assert_eq!(record.key, "docs/a.pdf");
        assert_eq!(record.size, Some(1024));
        assert_eq!(record.etag.as_deref(), Some("9e107d9d372bb6826bd81d3542a419d6"));
        assert_eq!(
            record.last_modified,
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn keyless_objects_are_skipped_and_missing_fields_stay_empty() {
        assert!(record_from_sdk(&Object::builder().size(5).build()).is_none());

        let record = record_from_sdk(&Object::builder().key("b.txt").build()).unwrap();
        assert_eq!(record, ObjectRecord::new("b.txt"));
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let record = record_from_sdk(&sdk_object("x", -3)).unwrap();
        assert_eq!(record.size, Some(0));
    }

    #[test]
    fn truncated_output_carries_token() {
        let output = ListObjectsV2Output::builder()
            .contents(sdk_object("a", 1))
            .contents(sdk_object("b", 2))
            .is_truncated(true)
            .next_continuation_token("t1")
            .build();

        let page = page_from_output(&output).unwrap();
        assert_eq!(page.objects.len(), 2);
        assert_eq!(page.next_token.as_deref(), Some("t1"));
    }

    #[test]
    fn final_page_has_no_token() {
        let output = ListObjectsV2Output::builder()
            .contents(sdk_object("a", 1))
            .is_truncated(false)
            .next_continuation_token("stale")
            .build();
        assert!(page_from_output(&output).unwrap().next_token.is_none());

        let output = ListObjectsV2Output::builder()
            .contents(sdk_object("a", 1))
            .build();
        assert!(page_from_output(&output).unwrap().next_token.is_none());
    }

    #[test]
    fn truncated_page_without_token_is_an_error() {
        let empty_token = ListObjectsV2Output::builder()
            .contents(sdk_object("a", 1))
            .is_truncated(true)
            .next_continuation_token("")
            .build();
        let err = page_from_output(&empty_token).unwrap_err();
        assert!(err.to_string().contains("without a continuation token"));

        let missing_token = ListObjectsV2Output::builder().is_truncated(true).build();
        assert!(page_from_output(&missing_token).is_err());
    }
}
