//! # Previously, on csvlift...
//!
//! 🎬 The bucket was far away. The credentials were fake. The test suite was
//! impatient. Someone had to play the object store without ever touching a
//! network card. That someone was this module.
//!
//! `InMemoryObjectStore` remembers every put behind an `Arc<Mutex<...>>` so a
//! test can inspect what "arrived". `InMemoryObjectStore::rejecting` plays the
//! bucket policy from hell: every put fails with a permission error.
//! `InMemoryConnector` hands out clones of one store and counts how many times
//! anybody asked, which is how tests prove the network was never approached.
//!
//! ⚠️ This is NOT for production. If you're uploading your quarterly numbers
//! to a `Vec`, please also deploy a therapist.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use crate::backends::{ObjectStore, ObjectStoreBackend, PutObject, PutOutcome, StoreConnector};
use crate::credentials::ResolvedCredentials;
use crate::destination::Destination;

/// 📦 A bucket that lives in RAM and forgets everything on drop.
///
/// Clones share the same storage, so a test can keep one handle and give the
/// other to the uploader.
#[derive(Debug, Default, Clone)]
pub struct InMemoryObjectStore {
    received: Arc<Mutex<Vec<PutObject>>>,
    attempts: Arc<AtomicUsize>,
    rejection: Option<String>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 🚫 A store that refuses every write with `PermissionDenied`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::default()
        }
    }

    /// 📬 Everything that was successfully put, in arrival order.
    pub async fn received(&self) -> Vec<PutObject> {
        self.received.lock().await.clone()
    }

    /// 🔢 Number of put calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<PutOutcome> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.rejection {
            let denied = io::Error::new(io::ErrorKind::PermissionDenied, reason.clone());
            return Err(anyhow::Error::new(denied).context(format!(
                "💀 PutObject on s3://{}/{} was refused by the in-memory bucket",
                object.bucket, object.key
            )));
        }

        trace!(
            "📬 {} bytes moved into RAM at s3://{}/{}",
            object.body.len(),
            object.bucket,
            object.key
        );
        let etag = format!("\"in-mem-{}\"", object.body.len());
        self.received.lock().await.push(object);
        Ok(PutOutcome { etag: Some(etag) })
    }
}

/// 🏗️ Connector that hands out the same in-memory store every time and keeps count.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConnector {
    store: InMemoryObjectStore,
    connections: Arc<AtomicUsize>,
}

impl InMemoryConnector {
    pub fn new(store: InMemoryObjectStore) -> Self {
        Self {
            store,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn store(&self) -> &InMemoryObjectStore {
        &self.store
    }

    /// 🔢 How many clients were built. Zero means nobody went near the network.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl StoreConnector for InMemoryConnector {
    fn connect(
        &self,
        _credentials: ResolvedCredentials<'_>,
        _destination: &Destination,
    ) -> Result<ObjectStoreBackend> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(ObjectStoreBackend::InMemory(self.store.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_put() -> PutObject {
        PutObject {
            bucket: "b".to_string(),
            key: "k.csv".to_string(),
            body: b"a,b\n1,2\n".to_vec(),
            content_type: "text/csv".to_string(),
        }
    }

    #[tokio::test]
    async fn the_one_where_the_ram_bucket_remembers_everything() {
        let store = InMemoryObjectStore::new();
        let outcome = store
            .put_object(sample_put())
            .await
            .expect("💀 the friendly in-memory bucket should accept the put");

        assert_eq!(outcome.etag.as_deref(), Some("\"in-mem-8\""));
        assert_eq!(store.attempts(), 1);
        assert_eq!(store.received().await, vec![sample_put()]);
    }

    #[tokio::test]
    async fn the_one_where_the_grumpy_bucket_says_permission_denied() {
        let store = InMemoryObjectStore::rejecting("Access Denied");
        let err = store
            .put_object(sample_put())
            .await
            .expect_err("💀 the rejecting bucket accepted a put. it had one job.");

        let denied = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<io::Error>())
            .expect("💀 the io::Error should still be in the chain");
        assert_eq!(denied.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(store.attempts(), 1);
        assert!(store.received().await.is_empty());
    }

    #[tokio::test]
    async fn the_one_where_the_connector_counts_every_handshake() {
        let connector = InMemoryConnector::new(InMemoryObjectStore::new());
        assert_eq!(connector.connections(), 0);

        let credentials = crate::credentials::Credentials::new("a", "s");
        let resolved = credentials.resolve().expect("💀 keys are present");
        let backend = connector
            .connect(resolved, &Destination::new("b", "k.csv"))
            .expect("💀 in-memory connect cannot fail");
        backend
            .put_object(sample_put())
            .await
            .expect("💀 in-memory put should succeed");

        assert_eq!(connector.connections(), 1);
        assert_eq!(connector.store().received().await.len(), 1);
    }
}
