//! Axum router assembly.

use axum::Router;
use axum::extract::Request;
use axum::middleware;
use axum::routing::get;
use tower::Layer;
use tower::util::MapRequestLayer;
use tower_http::trace::TraceLayer;

use mockdb_app::ports::DocumentRouter;

use crate::defaults::{self, RouterOptions};
use crate::rewrite;
use crate::state::AppState;

/// Build the top-level axum [`Router`] over a live document.
///
/// From the outside in: path rewriting, write-back, request tracing, CORS,
/// no-cache headers, the optional read-only guard, then the REST routes.
pub fn build<R>(state: AppState<R>, options: &RouterOptions) -> Router
where
    R: DocumentRouter + Send + Sync + 'static,
{
    let mut routes = Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes());
    if options.read_only {
        routes = routes.layer(middleware::from_fn(defaults::read_only_guard));
    }

    let app = routes
        .layer(defaults::no_cache())
        .layer(defaults::no_cache_pragma())
        .layer(defaults::expired())
        .layer(defaults::cors())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::write_back::persist_after_write::<R>,
        ))
        .with_state(state);

    if options.rewrite.is_empty() {
        return app;
    }
    let rules = options.rewrite.clone();
    let rewritten = MapRequestLayer::new(move |request: Request| {
        rewrite::rewrite_request(&rules, request)
    })
    .layer(app);
    Router::new().fallback_service(rewritten)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use mockdb_app::live_document::LiveDocument;
    use mockdb_app::memory_store::InMemoryDocumentStore;
    use mockdb_app::write_back::{WriteBack, WriteBackPolicy, WriteBackReport};
    use mockdb_domain::document::Document;
    use mockdb_domain::store_key::StoreKey;

    struct Harness {
        app: Router,
        store: Arc<InMemoryDocumentStore>,
        write_back: Arc<WriteBack>,
    }

    fn harness(options: &RouterOptions, policy: WriteBackPolicy) -> Harness {
        let store = Arc::new(InMemoryDocumentStore::new());
        let live = LiveDocument::new(
            Document::from_value(json!({
                "posts": [{"id": 1, "title": "x"}],
                "profile": {"name": "typicode"}
            }))
            .unwrap(),
        );
        let write_back = Arc::new(WriteBack::spawn(
            Arc::clone(&store),
            StoreKey::default(),
            policy,
        ));
        let state = AppState::from_arcs(Arc::new(live), Arc::clone(&write_back));
        Harness {
            app: build(state, options),
            store,
            write_back,
        }
    }

    fn default_harness() -> Harness {
        harness(&RouterOptions::default(), WriteBackPolicy::default())
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
        let builder = axum::http::Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_posts(store: &InMemoryDocumentStore) -> Vec<Value> {
        let text = store.raw(&StoreKey::default()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        value["posts"].as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_collection_under_api_prefix() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::GET, "/api/posts", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([{"id": 1, "title": "x"}]));
    }

    #[tokio::test]
    async fn should_serve_unprefixed_paths_too() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::GET, "/posts/1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"id": 1, "title": "x"}));
    }

    #[tokio::test]
    async fn should_return_whole_document_on_db_route() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::GET, "/api/db", None))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["profile"], json!({"name": "typicode"}));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_resource() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::GET, "/api/users", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_set_no_cache_and_cors_headers() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/posts")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "-1");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn should_create_record_and_write_back() {
        let h = default_harness();
        let mut reports = h.write_back.subscribe();

        let response = h
            .app
            .oneshot(request(
                Method::POST,
                "/api/posts",
                Some(json!({"title": "y"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await, json!({"id": 2, "title": "y"}));

        let report = reports.recv().await.unwrap();
        assert!(matches!(report, WriteBackReport::Persisted { revision: 1, .. }));
        assert_eq!(h.store.writes(), 1);
        assert_eq!(stored_posts(&h.store).len(), 2);
    }

    #[tokio::test]
    async fn should_not_write_back_on_read() {
        let h = default_harness();
        let app = h.app.clone();
        app.oneshot(request(Method::GET, "/api/posts", None))
            .await
            .unwrap();

        let mut reports = h.write_back.subscribe();
        h.app
            .oneshot(request(
                Method::PATCH,
                "/api/posts/1",
                Some(json!({"title": "z"})),
            ))
            .await
            .unwrap();

        // The only report is the one for the PATCH.
        assert_eq!(reports.recv().await.unwrap().revision(), 1);
        assert_eq!(h.store.writes(), 1);
    }

    #[tokio::test]
    async fn should_write_back_failed_mutation_by_default() {
        let h = default_harness();
        let mut reports = h.write_back.subscribe();

        let response = h
            .app
            .oneshot(request(Method::DELETE, "/api/posts/42", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(reports.recv().await.unwrap().revision(), 0);
        assert_eq!(h.store.writes(), 1);
    }

    #[tokio::test]
    async fn should_skip_failed_mutation_when_policy_says_so() {
        let h = harness(
            &RouterOptions::default(),
            WriteBackPolicy {
                skip_failed_mutations: true,
            },
        );
        let mut reports = h.write_back.subscribe();

        h.app
            .clone()
            .oneshot(request(Method::DELETE, "/api/posts/42", None))
            .await
            .unwrap();
        h.app
            .oneshot(request(Method::DELETE, "/api/posts/1", None))
            .await
            .unwrap();

        assert_eq!(reports.recv().await.unwrap().revision(), 1);
        assert_eq!(h.store.writes(), 1);
    }

    #[tokio::test]
    async fn should_reject_mutation_in_read_only_mode() {
        let options = RouterOptions {
            read_only: true,
            ..RouterOptions::default()
        };
        let h = harness(&options, WriteBackPolicy::default());

        let response = h
            .app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/posts",
                Some(json!({"title": "y"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = h
            .app
            .oneshot(request(Method::GET, "/api/posts", None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_replace_and_patch_singular_resource() {
        let h = default_harness();

        let response = h
            .app
            .clone()
            .oneshot(request(
                Method::PUT,
                "/api/profile",
                Some(json!({"name": "other"})),
            ))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, json!({"name": "other"}));

        let response = h
            .app
            .oneshot(request(
                Method::PATCH,
                "/api/profile",
                Some(json!({"age": 3})),
            ))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, json!({"name": "other", "age": 3}));
    }

    #[tokio::test]
    async fn should_reject_non_object_body() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(Method::POST, "/api/posts", Some(json!([1, 2]))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_accept_json_body_without_content_type() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/api/posts")
                    .body(Body::from(r#"{"title":"plain"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await, json!({"id": 2, "title": "plain"}));
    }

    #[tokio::test]
    async fn should_answer_400_when_body_is_not_json() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::PATCH)
                    .uri("/api/posts/1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"title\":"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            json_body(response).await["error"]
                .as_str()
                .unwrap()
                .starts_with("body is not valid JSON")
        );
    }

    #[tokio::test]
    async fn should_reject_duplicate_id_with_conflict() {
        let h = default_harness();
        let response = h
            .app
            .oneshot(request(
                Method::POST,
                "/api/posts",
                Some(json!({"id": 1, "title": "dup"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn should_disable_rewrite_when_no_rules() {
        let options = RouterOptions {
            read_only: false,
            rewrite: Vec::new(),
        };
        let h = harness(&options, WriteBackPolicy::default());
        let response = h
            .app
            .oneshot(request(Method::GET, "/api/posts", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
