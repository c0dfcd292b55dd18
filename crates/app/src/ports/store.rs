//! Store port: the durable key-value store holding the document.

use std::future::Future;

use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;
use mockdb_domain::store_key::StoreKey;

/// Durable key-value store holding one serialized [`Document`] per key.
pub trait DocumentStore {
    /// Read the document stored under `key`, or `None` when absent.
    fn get(
        &self,
        key: &StoreKey,
    ) -> impl Future<Output = Result<Option<Document>, MockDbError>> + Send;

    /// Write `document` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &StoreKey,
        document: &Document,
    ) -> impl Future<Output = Result<(), MockDbError>> + Send;
}

impl<T: DocumentStore + Send + Sync> DocumentStore for std::sync::Arc<T> {
    fn get(
        &self,
        key: &StoreKey,
    ) -> impl Future<Output = Result<Option<Document>, MockDbError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &StoreKey,
        document: &Document,
    ) -> impl Future<Output = Result<(), MockDbError>> + Send {
        (**self).set(key, document)
    }
}
