//! # mockdbd: mockdb daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`mockdb.toml` plus environment overrides)
//! - Initialize logging from the configured filter
//! - Open the document store (`SQLite` or in-memory)
//! - Construct the seed source, the state resolver and the entrypoint
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use mockdb_adapter_http_axum::entrypoint::{self, Entrypoint, ServerOptions};
use mockdb_adapter_seed_file::FileSeed;
use mockdb_adapter_storage_sqlite_sqlx::SqliteDocumentStore;
use mockdb_app::memory_store::InMemoryDocumentStore;
use mockdb_app::ports::DocumentStore;
use mockdb_app::state_cache::StateCache;
use mockdb_app::state_resolver::StateResolver;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StoreBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    match config.store.backend {
        StoreBackend::Sqlite => {
            let store = SqliteDocumentStore::connect(&config.store.url).await?;
            tracing::info!(url = %config.store.url, "sqlite store ready");
            serve(store, &config).await
        }
        StoreBackend::Memory => {
            tracing::warn!("in-memory store, mutations are lost on exit");
            serve(InMemoryDocumentStore::new(), &config).await
        }
    }
}

async fn serve<S>(store: S, config: &Config) -> Result<(), Box<dyn std::error::Error>>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let resolver = StateResolver::new(
        Arc::new(store),
        FileSeed::new(&config.seed.path),
        config.store_key()?,
        Arc::new(StateCache::new()),
    );
    let options = ServerOptions {
        router: config.router.clone(),
        write_back: config.write_back_policy(),
    };
    let entrypoint = Arc::new(Entrypoint::new(resolver, options));
    tracing::info!(
        runtime = ?Entrypoint::<S, FileSeed>::RUNTIME,
        seed = %config.seed.path.display(),
        "entrypoint ready"
    );

    let app = entrypoint::service(entrypoint);
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "mockdbd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("mockdbd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
