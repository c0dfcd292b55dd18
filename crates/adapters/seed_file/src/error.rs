//! Seed adapter error types.

use std::path::PathBuf;

use mockdb_domain::error::MockDbError;

/// Errors raised while loading the seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("failed to read seed file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object.
    #[error("seed file {} is not a valid JSON document", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SeedError> for MockDbError {
    fn from(err: SeedError) -> Self {
        Self::Seed(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_path_in_io_error() {
        let err = SeedError::Io {
            path: PathBuf::from("db.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read seed file db.json");
    }

    #[test]
    fn should_convert_into_seed_variant() {
        let err = SeedError::Io {
            path: PathBuf::from("db.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(matches!(MockDbError::from(err), MockDbError::Seed(_)));
    }
}
