//! The fixed key under which the whole document is persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MockDbError, ValidationError};

/// Key used when none is configured.
pub const DEFAULT_STORE_KEY: &str = "mock:db";

/// Identifier of the document inside the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreKey(String);

impl StoreKey {
    /// Build a key, rejecting empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`MockDbError::Validation`] when `key` is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, MockDbError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::EmptyStoreKey.into());
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StoreKey {
    fn default() -> Self {
        Self(DEFAULT_STORE_KEY.to_string())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StoreKey {
    type Err = MockDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StoreKey {
    type Error = MockDbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoreKey> for String {
    fn from(key: StoreKey) -> Self {
        key.0
    }
}
