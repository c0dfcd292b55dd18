//! Write-back middleware.
//!
//! Runs around every request. Once the inner service has produced the
//! response of a mutating request, the live document is snapshotted and
//! queued on the [`WriteBack`](mockdb_app::write_back::WriteBack) worker.
//! The response is returned without waiting for the store.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use mockdb_app::ports::DocumentRouter;

use crate::state::AppState;

/// Whether `method` can change the document.
#[must_use]
pub fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Axum middleware persisting the document after mutating requests.
pub async fn persist_after_write<R>(
    State(state): State<AppState<R>>,
    request: Request,
    next: Next,
) -> Response
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let method = request.method().clone();
    let response = next.run(request).await;

    if !is_mutating(&method) {
        return response;
    }
    let status = response.status();
    let succeeded = !(status.is_client_error() || status.is_server_error());
    if !state.write_back.policy().should_persist(succeeded) {
        tracing::debug!(%method, %status, "failed mutation not written back");
        return response;
    }

    let snapshot = state.router.snapshot().await;
    tracing::trace!(%method, %status, revision = snapshot.revision, "queueing write-back");
    state.write_back.submit(snapshot);
    response
}
