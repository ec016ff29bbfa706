//! Public object URLs in virtual-hosted style: `{scheme}://{bucket}.{host}/{key}`.
//!
//! Endpoints addressed by IP cannot carry a bucket subdomain; those fall back
//! to path style, `{scheme}://{ip}/{bucket}/{key}`.

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::{Host, Url};

/// Everything except RFC 3986 unreserved characters gets escaped, so `%`,
/// `\`, `?` and `#` inside a key survive as literal characters.
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Base URL for a single bucket, validated once at startup.
#[derive(Clone, Debug)]
pub struct PublicUrl {
    /// `{scheme}://{host}[:port]` plus `/{bucket}` for path style, no trailing `/`.
    prefix: String,
}

impl PublicUrl {
    /// Build the bucket's base URL from the storage endpoint.
    ///
    /// The endpoint must be an absolute `http` or `https` URL with a host.
    /// Any path or query on the endpoint is dropped.
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self> {
        let mut base =
            Url::parse(endpoint).with_context(|| format!("parsing storage endpoint `{endpoint}`"))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("storage endpoint `{endpoint}` must use http or https");
        }
        let path_prefix = match base.host() {
            Some(Host::Domain(host)) => {
                let virtual_host = format!("{bucket}.{host}");
                base.set_host(Some(&virtual_host)).with_context(|| {
                    format!("bucket `{bucket}` does not form a valid host name")
                })?;
                None
            }
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Some(bucket),
            None => bail!("storage endpoint `{endpoint}` has no host"),
        };
        base.set_path("");
        base.set_query(None);
        base.set_fragment(None);

        let mut prefix = base.as_str().trim_end_matches('/').to_string();
        if let Some(bucket) = path_prefix {
            prefix.push('/');
            prefix.push_str(&encode_segment(bucket));
        }
        Ok(Self { prefix })
    }

    /// Public URL of the object at `key`.
    ///
    /// Each `/`-separated segment is percent-encoded on its own and the path
    /// is never normalized, so distinct keys always yield distinct URLs.
    pub fn object_url(&self, key: &str) -> String {
        let mut url = self.prefix.clone();
        for segment in key.split('/') {
            url.push('/');
            url.push_str(&encode_segment(segment));
        }
        url
    }
}

fn encode_segment(segment: &str) -> String {
    match segment {
        // Dot segments would be collapsed by any URL parser.
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(segment, KEY_SEGMENT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_bucket_as_subdomain() {
        let urls = PublicUrl::new("https://s3.eu-central-1.example.com", "reports").unwrap();
        assert_eq!(
            urls.object_url("2024/term1.pdf"),
            "https://reports.s3.eu-central-1.example.com/2024/term1.pdf"
        );
    }

    #[test]
    fn keeps_port_and_drops_endpoint_path() {
        let urls = PublicUrl::new("http://minio.local:9000/ignored?x=1", "files").unwrap();
        assert_eq!(urls.object_url("a.txt"), "http://files.minio.local:9000/a.txt");
    }

    #[test]
    fn encodes_spaces_in_keys() {
        let urls = PublicUrl::new("https://s3.example.com", "files").unwrap();
        assert_eq!(
            urls.object_url("class photos/day 1.jpg"),
            "https://files.s3.example.com/class%20photos/day%201.jpg"
        );
    }

    #[test]
    fn ip_endpoints_use_path_style() {
        let urls = PublicUrl::new("http://127.0.0.1:9000", "files").unwrap();
        assert_eq!(urls.object_url("docs/a.pdf"), "http://127.0.0.1:9000/files/docs/a.pdf");
    }

    #[test]
    fn keys_are_not_normalized_or_decoded() {
        let urls = PublicUrl::new("https://s3.example.com", "files").unwrap();
        let base = "https://files.s3.example.com";

        assert_eq!(urls.object_url("a/../b.txt"), format!("{base}/a/%2E%2E/b.txt"));
        assert_eq!(urls.object_url("./c.txt"), format!("{base}/%2E/c.txt"));
        assert_eq!(urls.object_url("a\\b.txt"), format!("{base}/a%5Cb.txt"));
        assert_eq!(urls.object_url("a%20b.txt"), format!("{base}/a%2520b.txt"));
        assert_eq!(urls.object_url("q?x=1#top"), format!("{base}/q%3Fx%3D1%23top"));
        assert_eq!(urls.object_url("/x.txt"), format!("{base}//x.txt"));
        assert_ne!(urls.object_url("/x.txt"), urls.object_url("x.txt"));
    }

    #[test]
    fn encodes_non_ascii_keys() {
        let urls = PublicUrl::new("https://s3.example.com", "files").unwrap();
        assert_eq!(
            urls.object_url("élèves/liste.pdf"),
            "https://files.s3.example.com/%C3%A9l%C3%A8ves/liste.pdf"
        );
    }

    #[test]
    fn rejects_unusable_endpoints() {
        assert!(PublicUrl::new("not a url", "files").is_err());
        assert!(PublicUrl::new("ftp://s3.example.com", "files").is_err());
    }
}
