//! The reference document store.

use crate::error::{ServerError, ServerResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::debug;
use tradebook_remote::{Identity, RemoteSnapshot};
use uuid::Uuid;

/// Capacity of each identity's change feed.
const FEED_CAPACITY: usize = 32;

/// An in-process multi-device document store.
///
/// One snapshot per identity, replaced wholesale on every upsert. Every
/// write fans out to that identity's subscribers — including the writer
/// itself, exactly like the hosted backend's snapshot listener.
///
/// # Example
///
/// ```rust
/// use tradebook_server::DocumentStore;
/// use tradebook_remote::RemoteSnapshot;
/// use tradebook_model::UserDataDocument;
///
/// let store = DocumentStore::new();
/// let identity = store.issue_identity().unwrap();
///
/// store.upsert(&identity, RemoteSnapshot::of(&UserDataDocument::default())).unwrap();
/// assert!(store.fetch(&identity).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct DocumentStore {
    reachable: AtomicBool,
    snapshots: RwLock<HashMap<String, RemoteSnapshot>>,
    feeds: RwLock<HashMap<String, broadcast::Sender<RemoteSnapshot>>>,
}

impl DocumentStore {
    /// Creates a new, reachable, empty store.
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            snapshots: RwLock::new(HashMap::new()),
            feeds: RwLock::new(HashMap::new()),
        }
    }

    /// Simulates an outage (`false`) or recovery (`true`).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Whether the store currently accepts operations.
    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> ServerResult<()> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(ServerError::Unreachable)
        }
    }

    /// Issues a fresh anonymous identity.
    pub fn issue_identity(&self) -> ServerResult<Identity> {
        self.check_reachable()?;
        let identity = Identity::new(Uuid::new_v4().to_string());
        debug!(%identity, "issued anonymous identity");
        Ok(identity)
    }

    /// Replaces the identity's snapshot and notifies its subscribers.
    ///
    /// The backend's native operation is a merge, but snapshots carry a
    /// fixed set of fields that are all present on every write, so the
    /// merge degenerates to replacement.
    pub fn upsert(&self, identity: &Identity, snapshot: RemoteSnapshot) -> ServerResult<()> {
        self.check_reachable()?;
        self.snapshots
            .write()
            .insert(identity.as_str().to_string(), snapshot.clone());

        if let Some(feed) = self.feeds.read().get(identity.as_str()) {
            // No receivers is fine; the write stands on its own.
            let _ = feed.send(snapshot);
        }
        Ok(())
    }

    /// Point read of the identity's snapshot.
    pub fn fetch(&self, identity: &Identity) -> ServerResult<Option<RemoteSnapshot>> {
        self.check_reachable()?;
        Ok(self.snapshots.read().get(identity.as_str()).cloned())
    }

    /// Opens a change feed for the identity.
    ///
    /// Every subsequent upsert for the identity is delivered, whoever
    /// wrote it.
    pub fn subscribe(&self, identity: &Identity) -> ServerResult<broadcast::Receiver<RemoteSnapshot>> {
        self.check_reachable()?;
        let mut feeds = self.feeds.write();
        let feed = feeds
            .entry(identity.as_str().to_string())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0);
        Ok(feed.subscribe())
    }

    /// Number of stored snapshots.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.read().len()
    }
}
