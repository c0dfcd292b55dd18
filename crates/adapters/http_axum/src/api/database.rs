//! `GET /db`: the whole document.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use mockdb_app::ports::DocumentRouter;

use crate::state::AppState;

/// `GET /db`
pub async fn get<R>(State(state): State<AppState<R>>) -> Json<Value>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    Json(state.router.snapshot().await.document.into_value())
}
