//! # mockdb-adapter-seed-file
//!
//! Reads the seed document from a JSON file.
//!
//! ## Responsibilities
//! - Implement the `SeedSource` port defined in `mockdb-app::ports::seed`
//! - Resolve the seed path relative to the process working directory
//! - Report missing or malformed files as [`SeedError`]
//!
//! ## Dependency rule
//! Depends on `mockdb-app` (for port traits) and `mockdb-domain` (for domain types).

mod error;

use std::future::Future;
use std::path::{Path, PathBuf};

use mockdb_app::ports::SeedSource;
use mockdb_domain::document::Document;
use mockdb_domain::error::MockDbError;

pub use error::SeedError;

/// Seed path used when none is configured.
pub const DEFAULT_SEED_PATH: &str = "db.json";

/// Seed document stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSeed {
    path: PathBuf,
}

impl FileSeed {
    /// Seed read from `path`; relative paths resolve against the working
    /// directory at load time.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] when the file cannot be read and
    /// [`SeedError::Json`] when it is not a JSON object.
    pub async fn read(&self) -> Result<Document, SeedError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        let document = serde_json::from_str(&text).map_err(|source| SeedError::Json {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "seed document parsed");
        Ok(document)
    }
}

impl Default for FileSeed {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_PATH)
    }
}

impl SeedSource for FileSeed {
    fn load(&self) -> impl Future<Output = Result<Document, MockDbError>> + Send {
        async move { self.read().await.map_err(MockDbError::from) }
    }
}
