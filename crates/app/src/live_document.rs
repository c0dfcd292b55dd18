//! In-process [`DocumentRouter`] over a shared, lock-guarded document.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;
use mockdb_domain::id::RecordId;

use crate::ports::{DocumentRouter, Snapshot};

#[derive(Debug, Default)]
struct Inner {
    revision: u64,
    document: Document,
}

/// The live, mutable document of one warm instance.
///
/// Cloning is cheap and every clone sees the same state. Mutations take the
/// write lock and bump the revision only when they succeed.
#[derive(Debug, Clone, Default)]
pub struct LiveDocument {
    inner: Arc<RwLock<Inner>>,
}

impl LiveDocument {
    /// Wrap a freshly resolved document at revision zero.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                revision: 0,
                document,
            })),
        }
    }

    /// Current revision.
    pub async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }

    /// Whether both handles share the same underlying state.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    async fn mutate<F>(&self, op: F) -> Result<Value, MockDbError>
    where
        F: FnOnce(&mut Document) -> Result<Value, MockDbError>,
    {
        let mut guard = self.inner.write().await;
        let value = op(&mut guard.document)?;
        guard.revision += 1;
        Ok(value)
    }
}

impl DocumentRouter for LiveDocument {
    async fn read(&self, name: &str) -> Result<Value, MockDbError> {
        self.inner.read().await.document.read(name).cloned()
    }

    async fn find(&self, name: &str, id: &RecordId) -> Result<Value, MockDbError> {
        self.inner.read().await.document.find(name, id).cloned()
    }

    async fn create(&self, name: &str, body: Value) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.create(name, body)).await
    }

    async fn replace(&self, name: &str, id: &RecordId, body: Value) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.replace(name, id, body)).await
    }

    async fn patch(&self, name: &str, id: &RecordId, body: Value) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.patch(name, id, body)).await
    }

    async fn delete(&self, name: &str, id: &RecordId) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.delete(name, id)).await
    }

    async fn replace_singular(&self, name: &str, body: Value) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.replace_singular(name, body)).await
    }

    async fn patch_singular(&self, name: &str, body: Value) -> Result<Value, MockDbError> {
        self.mutate(|doc| doc.patch_singular(name, body)).await
    }

    async fn snapshot(&self) -> Snapshot {
        let guard = self.inner.read().await;
        Snapshot {
            revision: guard.revision,
            document: guard.document.clone(),
        }
    }
}
