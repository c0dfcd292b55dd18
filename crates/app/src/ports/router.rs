//! Router port: REST operations over the live document.
//!
//! A `DocumentRouter` is anything that, given a mapping of resource names
//! to records, can serve list/get/create/replace/patch/delete for each of
//! them and expose its current live state. The HTTP adapter only talks to
//! this trait.

use std::future::Future;

use serde_json::Value;

use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;
use mockdb_domain::id::RecordId;

/// A copy of the live document together with the revision it was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Number of successful mutations applied before the copy was taken.
    pub revision: u64,
    pub document: Document,
}

/// Serves REST operations for every resource of a document.
pub trait DocumentRouter {
    /// Read a whole resource (collection array or singular object).
    fn read(&self, name: &str) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Read one record of a collection.
    fn find(
        &self,
        name: &str,
        id: &RecordId,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Insert a record (or replace a singular resource).
    fn create(
        &self,
        name: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Replace a record, keeping its identifier.
    fn replace(
        &self,
        name: &str,
        id: &RecordId,
        body: Value,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Shallow-merge into a record.
    fn patch(
        &self,
        name: &str,
        id: &RecordId,
        body: Value,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Remove a record, returning it.
    fn delete(
        &self,
        name: &str,
        id: &RecordId,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Replace a singular resource.
    fn replace_singular(
        &self,
        name: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Shallow-merge into a singular resource.
    fn patch_singular(
        &self,
        name: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, MockDbError>> + Send;

    /// Copy the current live state.
    fn snapshot(&self) -> impl Future<Output = Snapshot> + Send;
}
