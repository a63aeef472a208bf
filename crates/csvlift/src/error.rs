//! 💀 UploadError — every way a one-shot upload can end badly.
//!
//! Two families:
//! - Preconditions (`CredentialsMissing`, `InvalidDestination`): caught before any
//!   I/O. Nothing was sent. Nothing was constructed. Fix the config and rerun.
//! - Everything after (`Serialization`, `UploadFailed`): the underlying cause rides
//!   along as the error source so the CLI can print the whole onion.
//!
//! No retries live anywhere near this type. One attempt, one verdict.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// 🔒 Required credential fields were absent or empty.
    #[error("missing required AWS credentials: {}", .missing.join(", "))]
    CredentialsMissing { missing: Vec<&'static str> },

    /// 🪣 Bucket or key was empty.
    #[error("invalid upload destination: {0}")]
    InvalidDestination(String),

    /// 📄 The dataset could not be rendered as CSV.
    #[error("failed to render dataset as CSV")]
    Serialization(#[from] csv::Error),

    /// 📡 The object store rejected the write or never answered.
    /// Permission, missing bucket, wrong region, dead network: all land here.
    #[error("upload to s3://{bucket}/{key} failed")]
    UploadFailed {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl UploadError {
    /// 🚦 True when the failure happened before any network interaction.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            UploadError::CredentialsMissing { .. } | UploadError::InvalidDestination(_)
        )
    }
}
