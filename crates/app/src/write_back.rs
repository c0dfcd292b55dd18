//! Write-back: persists the live document after mutating requests.
//!
//! Snapshots are handed to a dedicated worker task through an unbounded
//! channel, so the caller never waits on the store. The worker drains them
//! in submission order and reports every attempt on a broadcast channel;
//! failures are logged and reported there, never to the HTTP client.

use std::error::Error;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use mockdb_domain::error::MockDbError;
use mockdb_domain::store_key::StoreKey;
use mockdb_domain::time::{Timestamp, now};

use crate::ports::{DocumentStore, Snapshot};

const REPORT_CAPACITY: usize = 64;

/// When a finished mutating request should be persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteBackPolicy {
    /// Skip persistence when the mutating request ended with an error
    /// status. Off by default: every mutating request is persisted.
    pub skip_failed_mutations: bool,
}

impl WriteBackPolicy {
    /// Decide for a mutating request that finished with `succeeded`.
    #[must_use]
    pub fn should_persist(self, succeeded: bool) -> bool {
        succeeded || !self.skip_failed_mutations
    }
}

/// Outcome of one write-back attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBackReport {
    /// The snapshot was written to the store.
    Persisted { revision: u64, at: Timestamp },
    /// A newer revision was already persisted; the snapshot was dropped.
    Superseded { revision: u64, persisted: u64 },
    /// The store rejected the write.
    Failed { revision: u64, reason: String },
}

impl WriteBackReport {
    #[must_use]
    pub fn revision(&self) -> u64 {
        match self {
            Self::Persisted { revision, .. }
            | Self::Superseded { revision, .. }
            | Self::Failed { revision, .. } => *revision,
        }
    }
}

/// Handle to the write-back worker.
///
/// Dropping every handle closes the channel and lets the worker finish the
/// snapshots already queued before it exits.
pub struct WriteBack {
    sender: mpsc::UnboundedSender<Snapshot>,
    reports: broadcast::Sender<WriteBackReport>,
    policy: WriteBackPolicy,
}

impl WriteBack {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn<S>(store: Arc<S>, key: StoreKey, policy: WriteBackPolicy) -> Self
    where
        S: DocumentStore + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        tokio::spawn(run(store, key, receiver, reports.clone()));
        Self {
            sender,
            reports,
            policy,
        }
    }

    /// Queue a snapshot for persistence. Never waits on the store.
    ///
    /// Returns `false` when the worker is gone and the snapshot was dropped.
    pub fn submit(&self, snapshot: Snapshot) -> bool {
        let revision = snapshot.revision;
        if self.sender.send(snapshot).is_err() {
            tracing::warn!(revision, "write-back worker stopped, snapshot dropped");
            return false;
        }
        true
    }

    /// Subscribe to reports for snapshots submitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WriteBackReport> {
        self.reports.subscribe()
    }

    #[must_use]
    pub fn policy(&self) -> WriteBackPolicy {
        self.policy
    }
}

async fn run<S>(
    store: Arc<S>,
    key: StoreKey,
    mut receiver: mpsc::UnboundedReceiver<Snapshot>,
    reports: broadcast::Sender<WriteBackReport>,
) where
    S: DocumentStore + Send + Sync,
{
    let mut persisted: Option<u64> = None;
    while let Some(snapshot) = receiver.recv().await {
        let revision = snapshot.revision;
        let report = match persisted {
            Some(latest) if revision < latest => {
                tracing::debug!(revision, latest, "stale snapshot skipped");
                WriteBackReport::Superseded {
                    revision,
                    persisted: latest,
                }
            }
            _ => match store.set(&key, &snapshot.document).await {
                Ok(()) => {
                    persisted = Some(revision);
                    tracing::debug!(revision, key = %key, "document written back");
                    WriteBackReport::Persisted {
                        revision,
                        at: now(),
                    }
                }
                Err(err) => {
                    let reason = describe(&err);
                    tracing::error!(revision, key = %key, error = %reason, "write-back failed");
                    WriteBackReport::Failed { revision, reason }
                }
            },
        };
        // No subscriber is fine: the report has already been logged.
        let _ = reports.send(report);
    }
    tracing::debug!("write-back worker stopped");
}

fn describe(err: &MockDbError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::InMemoryDocumentStore;
    use mockdb_domain::document::Document;
    use serde_json::json;

    struct FailingStore;

    impl DocumentStore for FailingStore {
        async fn get(&self, _key: &StoreKey) -> Result<Option<Document>, MockDbError> {
            Ok(None)
        }

        async fn set(&self, _key: &StoreKey, _document: &Document) -> Result<(), MockDbError> {
            Err(MockDbError::Storage(Box::new(std::io::Error::other(
                "quota exceeded",
            ))))
        }
    }

    fn snapshot(revision: u64, posts: usize) -> Snapshot {
        let records: Vec<_> = (1..=posts).map(|id| json!({"id": id})).collect();
        Snapshot {
            revision,
            document: Document::from_value(json!({ "posts": records })).unwrap(),
        }
    }

    #[test]
    fn should_persist_failed_mutations_by_default() {
        let policy = WriteBackPolicy::default();
        assert!(policy.should_persist(true));
        assert!(policy.should_persist(false));
    }

    #[test]
    fn should_skip_failed_mutations_when_configured() {
        let policy = WriteBackPolicy {
            skip_failed_mutations: true,
        };
        assert!(policy.should_persist(true));
        assert!(!policy.should_persist(false));
    }

    #[tokio::test]
    async fn should_write_submitted_snapshot_to_store() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let write_back =
            WriteBack::spawn(Arc::clone(&store), StoreKey::default(), WriteBackPolicy::default());
        let mut reports = write_back.subscribe();

        assert!(write_back.submit(snapshot(1, 2)));

        let report = reports.recv().await.unwrap();
        assert!(matches!(report, WriteBackReport::Persisted { revision: 1, .. }));
        assert_eq!(store.writes(), 1);
        let stored = store.get(&StoreKey::default()).await.unwrap().unwrap();
        assert_eq!(stored, snapshot(1, 2).document);
    }

    #[tokio::test]
    async fn should_skip_snapshot_older_than_persisted_one() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let write_back =
            WriteBack::spawn(Arc::clone(&store), StoreKey::default(), WriteBackPolicy::default());
        let mut reports = write_back.subscribe();

        write_back.submit(snapshot(2, 3));
        write_back.submit(snapshot(1, 1));

        assert_eq!(reports.recv().await.unwrap().revision(), 2);
        assert_eq!(
            reports.recv().await.unwrap(),
            WriteBackReport::Superseded {
                revision: 1,
                persisted: 2
            }
        );
        assert_eq!(store.writes(), 1);
        let stored = store.get(&StoreKey::default()).await.unwrap().unwrap();
        assert_eq!(stored, snapshot(2, 3).document);
    }

    #[tokio::test]
    async fn should_report_failure_without_panicking() {
        let write_back = WriteBack::spawn(
            Arc::new(FailingStore),
            StoreKey::default(),
            WriteBackPolicy::default(),
        );
        let mut reports = write_back.subscribe();

        write_back.submit(snapshot(1, 1));

        match reports.recv().await.unwrap() {
            WriteBackReport::Failed { revision, reason } => {
                assert_eq!(revision, 1);
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }
}
