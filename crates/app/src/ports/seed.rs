//! Seed port: the fallback source of the initial document.

use std::future::Future;

use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;

/// Provides the document used when the store holds nothing yet.
pub trait SeedSource {
    /// Load the seed document.
    ///
    /// Failures are reported as [`MockDbError::Seed`].
    fn load(&self) -> impl Future<Output = Result<Document, MockDbError>> + Send;
}
