//! 🧅 Failure reporting — peel the onion of sadness, one layer at a time.
//!
//! Only the outermost caller ends the process. This module decides what it
//! says on the way out and which exit code it uses.

use tracing::error;

use crate::error::UploadError;

/// 🚪 Exit code for any failed run: missing credentials, bad config, failed upload.
pub const FAILURE_EXIT_CODE: i32 = 1;

const CREDENTIAL_HINTS: &[&str] = &["AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set"];

const UPLOAD_HINTS: &[&str] = &[
    "Most common causes:",
    "  • Invalid/expired credentials",
    "  • No s3:PutObject permission on this bucket/prefix",
    "  • Bucket does not exist or wrong region",
    "  • Network/connectivity issue in CI",
];

/// 🔧 Operator hints for whatever went wrong. Empty when we have nothing useful to add.
pub fn hints_for(err: &anyhow::Error) -> &'static [&'static str] {
    match err.downcast_ref::<UploadError>() {
        Some(UploadError::CredentialsMissing { .. }) => CREDENTIAL_HINTS,
        Some(UploadError::UploadFailed { .. }) => UPLOAD_HINTS,
        _ => &[],
    }
}

/// 🚦 True when the run died before the object store heard a single byte from us.
pub fn failed_before_sending(err: &anyhow::Error) -> bool {
    err.downcast_ref::<UploadError>()
        .is_some_and(UploadError::is_precondition)
}

/// 💀 Log the error, every cause in its chain, and the hints. Returns the exit code.
pub fn report_failure(err: &anyhow::Error) -> i32 {
    error!("💀 error: {}", err);
    for cause in err.chain().skip(1) {
        error!("⚠️  cause: {}", cause);
    }
    if failed_before_sending(err) {
        error!("🛑 Nothing was sent: the run stopped before contacting the object store.");
    }
    for hint in hints_for(err) {
        error!("{}", hint);
    }
    FAILURE_EXIT_CODE
}
