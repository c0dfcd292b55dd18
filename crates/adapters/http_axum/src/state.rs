//! Shared application state for axum handlers.

use std::sync::Arc;

use mockdb_app::ports::DocumentRouter;
use mockdb_app::write_back::WriteBack;

/// Application state shared across all axum handlers and middleware.
///
/// Generic over the document router to avoid dynamic dispatch.
/// `Clone` is implemented manually so `R` itself does not need to be
/// `Clone`.
pub struct AppState<R> {
    /// Live document serving the REST operations.
    pub router: Arc<R>,
    /// Write-back worker persisting mutations.
    pub write_back: Arc<WriteBack>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            write_back: Arc::clone(&self.write_back),
        }
    }
}

impl<R> AppState<R>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// Use this when the router or the write-back handle is also kept
    /// elsewhere, e.g. by the entrypoint.
    pub fn from_arcs(router: Arc<R>, write_back: Arc<WriteBack>) -> Self {
        Self { router, write_back }
    }
}
