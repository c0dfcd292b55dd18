//! # mockdb-domain
//!
//! Pure domain model for the mockdb mock REST server.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, the store key
//! - Define the **Document** (the single JSON value holding every resource)
//! - Define **resources**: collections (arrays of records) and singular
//!   resources (plain objects)
//! - Define **record identifiers** and how new ones are assigned
//! - Contain all invariant enforcement for reading and mutating the document
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod document;
pub mod store_key;
