//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MockDbError`] via `From`; adapters box their source errors into the
//! [`MockDbError::Storage`] or [`MockDbError::Seed`] variants.

use std::error::Error;
use std::fmt;

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum MockDbError {
    /// A request or document violated a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The addressed resource or record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The write would clash with an existing record.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The durable store failed to read or write.
    #[error("storage error")]
    Storage(#[source] Box<dyn Error + Send + Sync>),

    /// The seed document could not be loaded.
    #[error("seed error")]
    Seed(#[source] Box<dyn Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The top-level document is not a JSON object.
    #[error("document must be a JSON object mapping resource names to values")]
    DocumentNotAnObject,

    /// A request body or record is not a JSON object.
    #[error("body must be a JSON object")]
    BodyNotAnObject,

    /// A request body could not be parsed as JSON.
    #[error("body is not valid JSON: {0}")]
    MalformedBody(String),

    /// A collection operation was applied to a singular resource.
    #[error("resource `{0}` is not a collection")]
    NotACollection(String),

    /// A singular-resource operation was applied to a collection.
    #[error("resource `{0}` is not a singular resource")]
    NotASingular(String),

    /// The store key is empty.
    #[error("store key must not be empty")]
    EmptyStoreKey,
}

/// A resource or record lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct NotFoundError {
    /// Name of the top-level resource.
    pub resource: String,
    /// Record identifier, when a single record was addressed.
    pub id: Option<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {id} not found", self.resource),
            None => write!(f, "{} not found", self.resource),
        }
    }
}

/// Attempt to insert a record whose id is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{resource} already contains a record with id {id}")]
pub struct ConflictError {
    /// Name of the collection.
    pub resource: String,
    /// Duplicated identifier.
    pub id: String,
}
