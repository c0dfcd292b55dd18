//! Request entrypoint: builds the server on the first request and
//! delegates every request to it afterwards.
//!
//! The entrypoint is either **cold** (no handler built yet) or **warm**.
//! A cold entrypoint resolves the document, spawns the write-back worker
//! and assembles the router while holding the handler slot, so concurrent
//! first requests build it only once. A failed build answers `500` and
//! leaves the entrypoint cold; the next request tries again.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use tokio::sync::{RwLock, broadcast};
use tower::ServiceExt;

use mockdb_app::ports::{DocumentStore, SeedSource};
use mockdb_app::state_resolver::StateResolver;
use mockdb_app::write_back::{WriteBack, WriteBackPolicy, WriteBackReport};
use mockdb_domain::error::MockDbError;

use crate::defaults::RouterOptions;
use crate::error::ApiError;
use crate::state::AppState;

/// Execution environment the entrypoint requires from its host.
///
/// Only a regular process is supported: the seed is read from disk and
/// write-back runs on a long-lived task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Standard,
}

/// Lifecycle phase of an [`Entrypoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Cold,
    Warm,
}

/// Options used when the server is built.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub router: RouterOptions,
    pub write_back: WriteBackPolicy,
}

#[derive(Clone)]
struct Handler {
    router: Router,
    write_back: Arc<WriteBack>,
}

/// Lazily built request handler for one instance.
pub struct Entrypoint<S, D> {
    resolver: StateResolver<S, D>,
    options: ServerOptions,
    handler: RwLock<Option<Handler>>,
}

impl<S, D> Entrypoint<S, D>
where
    S: DocumentStore + Send + Sync + 'static,
    D: SeedSource + Send + Sync + 'static,
{
    /// The entrypoint needs the seed file and a background worker.
    pub const RUNTIME: Runtime = Runtime::Standard;

    /// Create a cold entrypoint.
    pub fn new(resolver: StateResolver<S, D>, options: ServerOptions) -> Self {
        Self {
            resolver,
            options,
            handler: RwLock::new(None),
        }
    }

    /// Serve one request, building the server first when cold.
    pub async fn handle(&self, request: Request) -> Response {
        let handler = match self.warm_up().await {
            Ok(handler) => handler,
            Err(err) => {
                tracing::error!(error = %err, "failed to build server");
                return ApiError::from(err).into_response();
            }
        };
        let result: Result<Response, Infallible> = handler.router.oneshot(request).await;
        let Ok(response) = result;
        response
    }

    pub async fn phase(&self) -> Phase {
        if self.handler.read().await.is_some() {
            Phase::Warm
        } else {
            Phase::Cold
        }
    }

    /// Subscribe to write-back reports of the current handler.
    ///
    /// Returns `None` while cold.
    pub async fn subscribe(&self) -> Option<broadcast::Receiver<WriteBackReport>> {
        self.handler
            .read()
            .await
            .as_ref()
            .map(|handler| handler.write_back.subscribe())
    }

    /// Drop the built handler and the cached document, as if the instance
    /// had been recycled. The next request resolves from the store again.
    pub async fn invalidate(&self) {
        self.handler.write().await.take();
        self.resolver.cache().invalidate();
        tracing::info!("entrypoint invalidated");
    }

    async fn warm_up(&self) -> Result<Handler, MockDbError> {
        if let Some(handler) = self.handler.read().await.as_ref() {
            return Ok(handler.clone());
        }

        let mut slot = self.handler.write().await;
        if let Some(handler) = slot.as_ref() {
            return Ok(handler.clone());
        }
        let handler = self.build().await?;
        *slot = Some(handler.clone());
        Ok(handler)
    }

    async fn build(&self) -> Result<Handler, MockDbError> {
        let (live, origin) = self.resolver.resolve_with_origin().await?;
        let write_back = Arc::new(WriteBack::spawn(
            Arc::clone(self.resolver.store()),
            self.resolver.key().clone(),
            self.options.write_back,
        ));
        let state = AppState::from_arcs(Arc::new(live), Arc::clone(&write_back));
        let router = crate::router::build(state, &self.options.router);
        tracing::info!(?origin, runtime = ?Self::RUNTIME, "server built");
        Ok(Handler { router, write_back })
    }
}

/// Wrap an entrypoint into a router that sends every request through it.
pub fn service<S, D>(entrypoint: Arc<Entrypoint<S, D>>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    D: SeedSource + Send + Sync + 'static,
{
    Router::new()
        .fallback(dispatch::<S, D>)
        .with_state(entrypoint)
}

async fn dispatch<S, D>(
    State(entrypoint): State<Arc<Entrypoint<S, D>>>,
    request: Request,
) -> Response
where
    S: DocumentStore + Send + Sync + 'static,
    D: SeedSource + Send + Sync + 'static,
{
    entrypoint.handle(request).await
}
