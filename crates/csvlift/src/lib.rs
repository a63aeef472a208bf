//! 🪣 csvlift — build a table, render it as CSV, put it in a bucket. Once.
//!
//! ```text
//! load_config → Dataset → CsvComposer → StoreConnector::connect → put_object → UploadReceipt
//! ```
//!
//! Everything the job needs is read once by [`app_config::load_config`] and
//! passed down explicitly; nothing below this file reads the environment.

pub mod app_config;
pub mod backends;
pub mod composers;
pub mod credentials;
pub mod dataset;
pub mod destination;
pub mod error;
pub mod preview;
pub mod report;
pub mod uploader;

use tracing::info;

pub use crate::app_config::AppConfig;
pub use crate::backends::StoreConnector;
pub use crate::credentials::Credentials;
pub use crate::dataset::{CellValue, Dataset};
pub use crate::destination::{Destination, UploadReceipt};
pub use crate::error::UploadError;
pub use crate::uploader::upload;

/// 🚀 Run the job with the sample dataset against the configured S3 target.
pub async fn run(app_config: AppConfig) -> anyhow::Result<UploadReceipt> {
    run_with(&app_config, &Dataset::sample(), &app_config.connector()).await
}

/// 🚀 Same as [`run`], with the dataset and store connector supplied by the caller.
pub async fn run_with(
    app_config: &AppConfig,
    dataset: &Dataset,
    connector: &dyn StoreConnector,
) -> anyhow::Result<UploadReceipt> {
    let destination = app_config.destination();
    let credentials = app_config.credentials();
    // -- 🔒 no credentials, no speeches: fail before the target/preview lines
    if let Err(missing) = credentials.resolve() {
        return Err(UploadError::CredentialsMissing { missing }.into());
    }

    info!("🎯 Target: {}", destination.s3_uri());
    info!("🌎 Region: {}", destination.region);
    info!("📊 Dataset preview:\n{}", preview::render_preview(dataset));

    let receipt = upload(dataset, &destination, &credentials, connector).await?;

    info!("✅ Upload successful ✓");
    info!("📍 Location: {}", receipt.s3_uri());
    info!("🌐 Full URI: {}", receipt.location);
    Ok(receipt)
}
