//! # mockdb-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the document as a **json-server style REST API**: collections
//!   under `/{name}` and `/{name}/{id}`, singular resources under `/{name}`,
//!   the whole document under `/db`
//! - Rewrite paths before routing (`/api/*` → `/*` by default)
//! - Queue a write-back of the document after every mutating request
//! - Build the server lazily on the first request ([`entrypoint`])
//!
//! ## Dependency rule
//! Depends on `mockdb-app` (for port traits and the write-back worker) and
//! `mockdb-domain` (for error mapping). Never leaks axum types into the
//! domain.

pub mod api;
pub mod defaults;
pub mod entrypoint;
pub mod error;
pub mod rewrite;
pub mod router;
pub mod state;
pub mod write_back;
