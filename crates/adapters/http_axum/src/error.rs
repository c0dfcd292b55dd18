//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use mockdb_domain::error::MockDbError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

/// Maps [`MockDbError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(MockDbError);

impl From<MockDbError> for ApiError {
    fn from(err: MockDbError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MockDbError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            MockDbError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            MockDbError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            MockDbError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            MockDbError::Seed(err) => {
                tracing::error!(error = %err, "seed error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
