//! # mockdb-adapter-storage-sqlite-sqlx
//!
//! `SQLite` key-value persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `DocumentStore` port defined in `mockdb-app::ports::store`
//! - Open the `SQLite` database and run embedded migrations on connect
//! - Store each document as JSON text in a single `kv` table
//!
//! ## Dependency rule
//! Depends on `mockdb-app` (for port traits) and `mockdb-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod document_store;
mod error;
mod pool;

pub use document_store::SqliteDocumentStore;
pub use error::StorageError;
