//! In-process [`DocumentStore`] keeping serialized documents in a map.
//!
//! Values are stored as JSON text, exactly like the durable adapters, so a
//! round-trip through this store normalizes the document the same way.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;
use mockdb_domain::store_key::StoreKey;

use crate::ports::DocumentStore;

/// Volatile key-value store. Counts reads and writes.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    values: Mutex<HashMap<StoreKey, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls served so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw JSON text stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &StoreKey) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(
        &self,
        key: &StoreKey,
    ) -> impl Future<Output = Result<Option<Document>, MockDbError>> + Send {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let result = self
            .raw(key)
            .map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(|err| MockDbError::Storage(Box::new(err)));
        async { result }
    }

    fn set(
        &self,
        key: &StoreKey,
        document: &Document,
    ) -> impl Future<Output = Result<(), MockDbError>> + Send {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let result = serde_json::to_string(document)
            .map(|text| {
                self.values
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.clone(), text);
            })
            .map_err(|err| MockDbError::Storage(Box::new(err)));
        async { result }
    }
}
