//! JSON REST handlers for collections and singular resources.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use mockdb_app::ports::DocumentRouter;
use mockdb_domain::id::RecordId;

use crate::api::body::JsonBody;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Value>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    /// The record is gone; the body is an empty object.
    Ok,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => Json(Value::Object(Map::new())).into_response(),
        }
    }
}

/// `GET /{name}`
pub async fn read<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let value = state.router.read(&name).await?;
    Ok(Json(value))
}

/// `GET /{name}/{id}`
pub async fn find<R>(
    State(state): State<AppState<R>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let record = state.router.find(&name, &RecordId::new(id)).await?;
    Ok(Json(record))
}

/// `POST /{name}`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<CreateResponse, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let created = state.router.create(&name, body).await?;
    tracing::debug!(resource = %name, "record created");
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /{name}/{id}`
pub async fn replace<R>(
    State(state): State<AppState<R>>,
    Path((name, id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let record = state.router.replace(&name, &RecordId::new(id), body).await?;
    Ok(Json(record))
}

/// `PATCH /{name}/{id}`
pub async fn patch<R>(
    State(state): State<AppState<R>>,
    Path((name, id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let record = state.router.patch(&name, &RecordId::new(id), body).await?;
    Ok(Json(record))
}

/// `DELETE /{name}/{id}`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    state.router.delete(&name, &RecordId::new(id)).await?;
    tracing::debug!(resource = %name, "record deleted");
    Ok(DeleteResponse::Ok)
}

/// `PUT /{name}` on a singular resource.
pub async fn replace_singular<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let value = state.router.replace_singular(&name, body).await?;
    Ok(Json(value))
}

/// `PATCH /{name}` on a singular resource.
pub async fn patch_singular<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let value = state.router.patch_singular(&name, body).await?;
    Ok(Json(value))
}
