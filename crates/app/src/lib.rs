//! # mockdb-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DocumentStore`: get/set the serialized document under a key
//!   - `SeedSource`: load the fallback seed document
//! - Define the **driving port** consumed by the HTTP layer:
//!   - `DocumentRouter`: REST operations over a document, plus snapshots
//! - Provide the use-cases:
//!   - `StateResolver`: cache → store → seed resolution
//!   - `WriteBack`: ordered, non-blocking persistence after mutations
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (`StateCache`, `LiveDocument`, `InMemoryDocumentStore`)
//!
//! ## Dependency rule
//! Depends on `mockdb-domain` only (plus `tokio::sync` for locks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod live_document;
pub mod memory_store;
pub mod ports;
pub mod state_cache;
pub mod state_resolver;
pub mod write_back;
