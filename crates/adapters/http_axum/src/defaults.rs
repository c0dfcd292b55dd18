//! Default middlewares wrapped around the REST routes.
//!
//! Mirrors what a json-server style mock gives out of the box: permissive
//! CORS, no-cache headers, request logging and an optional read-only mode.

use axum::Json;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::ErrorBody;
use crate::rewrite::RewriteRule;
use crate::write_back::is_mutating;

/// Options for the router built around a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Reject every mutating request with `403 Forbidden`.
    pub read_only: bool,
    /// Rewrites applied before routing, first match wins.
    pub rewrite: Vec<RewriteRule>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            rewrite: vec![RewriteRule::api_prefix()],
        }
    }
}

/// Permissive CORS, as expected from a mock backend.
#[must_use]
pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// `Cache-Control: no-cache`.
#[must_use]
pub fn no_cache() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
}

/// `Pragma: no-cache`.
#[must_use]
pub fn no_cache_pragma() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::PRAGMA, HeaderValue::from_static("no-cache"))
}

/// `Expires: -1`.
#[must_use]
pub fn expired() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::EXPIRES, HeaderValue::from_static("-1"))
}

/// Middleware rejecting mutating requests in read-only mode.
pub async fn read_only_guard(request: Request, next: Next) -> Response {
    if is_mutating(request.method()) {
        tracing::debug!(method = %request.method(), "mutation rejected in read-only mode");
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                error: "read-only mode".to_string(),
            }),
        )
            .into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_api_prefix_rewrite() {
        let options = RouterOptions::default();
        assert!(!options.read_only);
        assert_eq!(options.rewrite, vec![RewriteRule::api_prefix()]);
    }
}
