//! Opening the database that backs [`SqliteDocumentStore`].
//!
//! [`SqliteDocumentStore`]: crate::SqliteDocumentStore

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Write-back is a single writer, readers only hit the store on cold start.
const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open `url`, creating the database file when missing, and bring the `kv`
/// table up to date.
pub(crate) async fn open(url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_only_create_kv_table() {
        let pool = open("sqlite::memory:").await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["kv"]);
    }

    #[tokio::test]
    async fn should_keep_rows_when_reopening_file_database() {
        let path = std::env::temp_dir().join(format!("mockdb-reopen-{}.db", std::process::id()));
        let url = format!("sqlite:{}", path.display());

        let first = open(&url).await.unwrap();
        sqlx::query("INSERT INTO kv (key, value, updated_at) VALUES ('k', '{}', 'now')")
            .execute(&first)
            .await
            .unwrap();
        first.close().await;

        let second = open(&url).await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv")
            .fetch_one(&second)
            .await
            .unwrap();
        second.close().await;
        std::fs::remove_file(&path).unwrap();

        assert_eq!(count.0, 1);
    }
}
