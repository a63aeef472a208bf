//! 🪣📡 S3 backend — one signed PUT, no encores.
//!
//! INT. AWS CONSOLE — NIGHT. A bucket in us-east-1 waits for a CSV it was
//! promised in a CI job three commits ago. The job builds a client, sends
//! one PutObject, and either gets an ETag back or a very specific reason why not.
//!
//! 🧠 Knowledge graph:
//! - Client is built from explicit static credentials. No credential chain, no
//!   IMDS, no ~/.aws spelunking: the config already read the environment once.
//! - Session token is forwarded only when present.
//! - `RetryConfig::disabled()`: the SDK makes exactly one attempt. One shot, one verdict.
//! - Optional `endpoint_url` for S3-compatible stores (MinIO & friends) switches
//!   to path-style addressing, because `bucket.127.0.0.1` is not a hostname.
//! - SDK errors are flattened with `DisplayErrorContext` so the log shows the
//!   service code (AccessDenied, NoSuchBucket...) and not just "service error".

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region, RequestChecksumCalculation};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::backends::{ObjectStore, ObjectStoreBackend, PutObject, PutOutcome, StoreConnector};
use crate::credentials::ResolvedCredentials;
use crate::destination::Destination;

// -- 🏷️ shows up in SDK debug logs as the credential provider name
const CREDENTIALS_PROVIDER_NAME: &str = "csvlift-environment";

/// 🏗️ Builds a fresh `S3ObjectStore` per upload.
#[derive(Debug, Clone, Default)]
pub struct S3Connector {
    /// 🌐 Custom S3-compatible endpoint. `None` means the real AWS endpoint.
    pub endpoint_url: Option<String>,
}

impl S3Connector {
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.filter(|url| !url.is_empty()),
        }
    }
}

impl StoreConnector for S3Connector {
    fn connect(
        &self,
        credentials: ResolvedCredentials<'_>,
        destination: &Destination,
    ) -> Result<ObjectStoreBackend> {
        Ok(ObjectStoreBackend::S3(S3ObjectStore::new(
            credentials,
            &destination.region,
            self.endpoint_url.as_deref(),
        )))
    }

    fn location(&self, destination: &Destination) -> String {
        match &self.endpoint_url {
            Some(endpoint_url) => destination.endpoint_location(endpoint_url),
            None => destination.aws_location(),
        }
    }
}

/// 🪣 An `aws-sdk-s3` client wired for single-attempt puts.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(
        credentials: ResolvedCredentials<'_>,
        region: &str,
        endpoint_url: Option<&str>,
    ) -> Self {
        let sdk_credentials = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            credentials.session_token.map(str::to_string),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(sdk_credentials)
            .retry_config(RetryConfig::disabled())
            // -- 🧮 checksums only when the operation demands one. PutObject doesn't.
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired);

        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url).force_path_style(true);
        }

        debug!(
            region,
            endpoint = endpoint_url.unwrap_or("aws"),
            has_session_token = credentials.session_token.is_some(),
            "🔧 S3 client assembled"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<PutOutcome> {
        let body_len = object.body.len();
        debug!(
            "📡 PUT s3://{}/{} — {} bytes of {}",
            object.bucket, object.key, body_len, object.content_type
        );

        let response = self
            .client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .content_type(&object.content_type)
            .body(ByteStream::from(object.body))
            .send()
            .await
            .map_err(|sdk_error| {
                let detail = DisplayErrorContext(&sdk_error).to_string();
                anyhow::Error::new(sdk_error).context(detail)
            })
            .with_context(|| {
                format!(
                    "💀 PutObject for s3://{}/{} did not go through",
                    object.bucket, object.key
                )
            })?;

        Ok(PutOutcome {
            etag: response.e_tag().map(str::to_string),
        })
    }
}
