//! Storage-specific error type wrapping sqlx errors.

use mockdb_domain::error::MockDbError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// The stored value is not a valid document, or the document could not
    /// be serialized.
    #[error("JSON (de)serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for MockDbError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
