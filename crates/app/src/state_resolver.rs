//! State resolver: turns cache, store and seed into one live document.

use std::sync::Arc;

use mockdb_domain::error::MockDbError;
use mockdb_domain::store_key::StoreKey;

use crate::live_document::LiveDocument;
use crate::ports::{DocumentStore, SeedSource};
use crate::state_cache::StateCache;

/// Where a resolved document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The process-local cache was already populated.
    Cache,
    /// Read from the durable store.
    Store,
    /// Loaded from the seed and written to the store.
    Seed,
}

/// Resolves the current document for one instance.
pub struct StateResolver<S, D> {
    store: Arc<S>,
    seed: D,
    key: StoreKey,
    cache: Arc<StateCache>,
}

impl<S, D> StateResolver<S, D>
where
    S: DocumentStore + Send + Sync,
    D: SeedSource + Send + Sync,
{
    /// Create a resolver over the given store, seed and cache slot.
    pub fn new(store: Arc<S>, seed: D, key: StoreKey, cache: Arc<StateCache>) -> Self {
        Self {
            store,
            seed,
            key,
            cache,
        }
    }

    /// Return the live document.
    ///
    /// A populated cache answers without I/O. Otherwise the store is read
    /// once; when it holds nothing the seed is loaded and written to the
    /// store before being cached.
    ///
    /// # Errors
    ///
    /// Returns [`MockDbError::Storage`] when the store fails and
    /// [`MockDbError::Seed`] when the seed cannot be loaded. Nothing is
    /// cached on failure.
    pub async fn resolve(&self) -> Result<LiveDocument, MockDbError> {
        self.resolve_with_origin().await.map(|(live, _)| live)
    }

    /// Same as [`StateResolver::resolve`], also reporting the origin.
    ///
    /// # Errors
    ///
    /// See [`StateResolver::resolve`].
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub async fn resolve_with_origin(&self) -> Result<(LiveDocument, Origin), MockDbError> {
        if let Some(live) = self.cache.get() {
            return Ok((live, Origin::Cache));
        }

        let (document, origin) = match self.store.get(&self.key).await? {
            Some(document) => {
                tracing::info!("document loaded from store");
                (document, Origin::Store)
            }
            None => {
                tracing::info!("store is empty, loading seed document");
                let document = self.seed.load().await?;
                self.store.set(&self.key, &document).await?;
                tracing::info!(
                    resources = document.as_map().len(),
                    "seed document written to store"
                );
                (document, Origin::Seed)
            }
        };

        let live = self.cache.populate(LiveDocument::new(document));
        Ok((live, origin))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    #[must_use]
    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }
}
