//! 🔌 Backends — where the one and only network call happens.
//!
//! 🪣 An object store takes bytes and a name and keeps them. That's the whole job.
//! This module is the casting agency: real S3 for production, an in-memory
//! stand-in for tests that want to know exactly what would have been written.
//!
//! 🧠 Knowledge graph:
//! - `ObjectStore`: trait → concrete impls (`S3ObjectStore`, `InMemoryObjectStore`)
//!   → `ObjectStoreBackend` enum dispatcher. Same shape as every other backend family.
//! - `StoreConnector`: builds a fresh backend per upload from validated credentials.
//!   The uploader only calls it after every local precondition passed.
//! - `PutObject`: the fully rendered request. Bucket, key, body, content type. No streaming.
//!
//! 🦆 The duck does not have s3:PutObject. The duck has never had s3:PutObject.

use anyhow::Result;
use async_trait::async_trait;

use crate::credentials::ResolvedCredentials;
use crate::destination::Destination;

pub mod in_mem;
pub mod s3;

pub use in_mem::{InMemoryConnector, InMemoryObjectStore};
pub use s3::{S3Connector, S3ObjectStore};

/// 📄 Content type stamped on every CSV object.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// 📦 A single put request, fully rendered. The store sends it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// ✅ What the store said after accepting a put.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOutcome {
    pub etag: Option<String>,
}

/// 🪣 Something that can store an object in one request.
///
/// # Contract
/// - `put_object` issues exactly one write. No retries, no multipart, no second chances.
/// - Errors carry the underlying cause; callers decide how to present it.
#[async_trait]
pub trait ObjectStore: std::fmt::Debug + Send + Sync {
    async fn put_object(&self, object: PutObject) -> Result<PutOutcome>;
}

/// 🎭 The many faces of an object store.
#[derive(Debug)]
pub enum ObjectStoreBackend {
    S3(S3ObjectStore),
    InMemory(InMemoryObjectStore),
}

#[async_trait]
impl ObjectStore for ObjectStoreBackend {
    async fn put_object(&self, object: PutObject) -> Result<PutOutcome> {
        match self {
            ObjectStoreBackend::S3(store) => store.put_object(object).await,
            ObjectStoreBackend::InMemory(store) => store.put_object(object).await,
        }
    }
}

/// 🏗️ Builds an object store client for one upload.
///
/// Clients are never pooled or reused: every upload gets a fresh one, built
/// from credentials that already passed validation.
pub trait StoreConnector: std::fmt::Debug + Send + Sync {
    fn connect(
        &self,
        credentials: ResolvedCredentials<'_>,
        destination: &Destination,
    ) -> Result<ObjectStoreBackend>;

    /// 🌐 URL the object will be reachable at once written.
    fn location(&self, destination: &Destination) -> String {
        destination.aws_location()
    }
}
