//! 🪣 Destination and receipt — where the bytes go, and the proof they got there.

/// 🌎 Region used when none is configured. The Florida of AWS regions.
pub const DEFAULT_REGION: &str = "us-east-1";

/// 🎯 Bucket, key and region of the object about to be written.
///
/// The key may contain `/` separators; object stores treat them as part of the
/// name, consoles pretend they are folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
    pub region: String,
}

impl Destination {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// 🌎 Override the region. An empty region keeps the default.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        if !region.is_empty() {
            self.region = region;
        }
        self
    }

    /// ✅ Checks the fields that must be non-empty before anyone talks to the network.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("bucket name must not be empty".to_string());
        }
        if self.key.is_empty() {
            return Err(format!(
                "object key must not be empty (bucket '{}')",
                self.bucket
            ));
        }
        Ok(())
    }

    /// 🏷️ `s3://bucket/key` — the form operators paste into the CLI.
    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    /// 🌐 HTTPS URL of the object on the public AWS endpoint (virtual-hosted style).
    pub fn aws_location(&self) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, self.key
        )
    }

    /// 🌐 URL of the object on a custom S3-compatible endpoint (path style).
    pub fn endpoint_location(&self, endpoint_url: &str) -> String {
        format!(
            "{}/{}/{}",
            endpoint_url.trim_end_matches('/'),
            self.bucket,
            self.key
        )
    }
}

/// 🧾 What a successful upload hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub region: String,
    /// 🌐 Full URL of the written object.
    pub location: String,
    pub bytes_written: usize,
    pub etag: Option<String>,
}

impl UploadReceipt {
    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
