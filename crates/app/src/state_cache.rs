//! Process-local cache: the single slot holding the live document of a
//! warm instance.

use std::sync::{PoisonError, RwLock};

use crate::live_document::LiveDocument;

/// Explicit holder for the in-memory document.
///
/// Lifecycle: empty until [`StateCache::populate`] is called, then read via
/// [`StateCache::get`] until [`StateCache::invalidate`] empties it again.
/// The slot is never shared between instances.
#[derive(Debug, Default)]
pub struct StateCache {
    slot: RwLock<Option<LiveDocument>>,
}

impl StateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document, if any. Performs no I/O.
    #[must_use]
    pub fn get(&self) -> Option<LiveDocument> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store `live` unless the slot is already populated.
    ///
    /// Returns whichever document ends up in the slot, so a concurrent
    /// second population keeps the first one.
    pub fn populate(&self, live: LiveDocument) -> LiveDocument {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert(live).clone()
    }

    /// Empty the slot, simulating an instance recycle.
    pub fn invalidate(&self) {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
