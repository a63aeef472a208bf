//! 🚀 The Uploader — dataset in, receipt out, exactly one network call in between.
//!
//! 🧠 Knowledge graph, in the order things happen:
//! 1. credentials resolve, or `CredentialsMissing` (nothing built, nothing sent)
//! 2. destination validates, or `InvalidDestination` (still nothing built)
//! 3. dataset renders to CSV, or `Serialization`
//! 4. connector builds a fresh store client (never pooled)
//! 5. one `put_object`, content type `text/csv`, or `UploadFailed` with the cause attached
//! 6. receipt with bucket, key, region and the full object URL
//!
//! 📜 "He who validates after connecting, debugs the network for a typo in the config."

use tracing::{debug, info};

use crate::backends::{CSV_CONTENT_TYPE, ObjectStore, PutObject, StoreConnector};
use crate::composers::CsvComposer;
use crate::credentials::Credentials;
use crate::dataset::Dataset;
use crate::destination::{Destination, UploadReceipt};
use crate::error::UploadError;

/// 📡 Render `dataset` as CSV and put it at `destination`, in a single attempt.
pub async fn upload(
    dataset: &Dataset,
    destination: &Destination,
    credentials: &Credentials,
    connector: &dyn StoreConnector,
) -> Result<UploadReceipt, UploadError> {
    let resolved = credentials
        .resolve()
        .map_err(|missing| UploadError::CredentialsMissing { missing })?;
    destination
        .validate()
        .map_err(UploadError::InvalidDestination)?;

    let body = CsvComposer::default().compose(dataset)?;
    let bytes_written = body.len();
    debug!(
        "📄 rendered {} rows × {} columns into {} bytes of CSV",
        dataset.num_rows(),
        dataset.num_columns(),
        bytes_written
    );

    let upload_failed = |source: anyhow::Error| UploadError::UploadFailed {
        bucket: destination.bucket.clone(),
        key: destination.key.clone(),
        source,
    };

    let store = connector
        .connect(resolved, destination)
        .map_err(upload_failed)?;

    info!("🚀 Uploading CSV to S3...");
    let outcome = store
        .put_object(PutObject {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            body,
            content_type: CSV_CONTENT_TYPE.to_string(),
        })
        .await
        .map_err(upload_failed)?;

    Ok(UploadReceipt {
        bucket: destination.bucket.clone(),
        key: destination.key.clone(),
        region: destination.region.clone(),
        location: connector.location(destination),
        bytes_written,
        etag: outcome.etag,
    })
}
