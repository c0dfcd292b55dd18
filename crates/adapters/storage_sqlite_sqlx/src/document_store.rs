//! `SQLite` implementation of [`DocumentStore`].

use std::future::Future;

use sqlx::SqlitePool;

use mockdb_app::ports::DocumentStore;
use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;
use mockdb_domain::store_key::StoreKey;
use mockdb_domain::time::{now, stamp};

use crate::error::StorageError;
use crate::pool;

const SELECT_BY_KEY: &str = "SELECT value FROM kv WHERE key = ?";
const UPSERT: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// `SQLite`-backed key-value store holding one JSON document per key.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open the database at `url` (e.g. `sqlite:mockdb.db` or
    /// `sqlite::memory:`) and run pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the URL is invalid, the database cannot
    /// be opened, or a migration fails.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let pool = pool::open(url).await?;
        Ok(Self { pool })
    }

    /// Use an already opened pool. The `kv` table must exist.
    #[must_use]
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn get(
        &self,
        key: &StoreKey,
    ) -> impl Future<Output = Result<Option<Document>, MockDbError>> + Send {
        let pool = self.pool.clone();
        let key = key.as_str().to_string();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_BY_KEY)
                .bind(key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let document = row
                .map(|(text,)| serde_json::from_str::<Document>(&text))
                .transpose()
                .map_err(StorageError::from)?;
            Ok(document)
        }
    }

    fn set(
        &self,
        key: &StoreKey,
        document: &Document,
    ) -> impl Future<Output = Result<(), MockDbError>> + Send {
        let pool = self.pool.clone();
        let key = key.as_str().to_string();
        let text = serde_json::to_string(document);
        async move {
            let text = text.map_err(StorageError::from)?;
            sqlx::query(UPSERT)
                .bind(key)
                .bind(text)
                .bind(stamp(now()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
