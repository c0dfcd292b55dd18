//! Request body extractor that reads JSON whatever the `Content-Type`.
//!
//! Clients of a mock backend often omit the header (`curl -d`, bare
//! `fetch`), so the body is parsed as JSON regardless. An empty body reads
//! as an empty object.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use mockdb_domain::error::{MockDbError, ValidationError};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        parse(&bytes)
            .map(Self)
            .map_err(|err| ApiError::from(err).into_response())
    }
}

fn parse(bytes: &[u8]) -> Result<Value, MockDbError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes)
        .map_err(|err| ValidationError::MalformedBody(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_read_empty_body_as_empty_object() {
        assert_eq!(parse(b"").unwrap(), json!({}));
        assert_eq!(parse(b" \n").unwrap(), json!({}));
    }

    #[test]
    fn should_reject_malformed_json() {
        let err = parse(b"{\"title\":").unwrap_err();
        assert!(matches!(
            err,
            MockDbError::Validation(ValidationError::MalformedBody(_))
        ));
    }
}
