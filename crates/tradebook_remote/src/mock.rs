//! A mock remote tier for testing.

use crate::error::{RemoteError, RemoteResult};
use crate::identity::{Identity, IdentityProvider};
use crate::listener::{ChangeListener, ChangeStream, ListenerEvent, Subscription};
use crate::snapshot::RemoteSnapshot;
use crate::store::RemoteStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;
use tradebook_model::UserDataDocument;

/// An in-memory remote tier implementing all three adapter traits.
///
/// Failures are scripted per operation and every push is captured, which
/// makes this the unit-test double for the reconciliation engine.
#[derive(Debug, Default)]
pub struct MockRemote {
    fail_identity: AtomicBool,
    fail_push: AtomicBool,
    fail_pull: AtomicBool,
    fail_subscribe: AtomicBool,
    issuance_count: AtomicU64,
    snapshot: Mutex<Option<RemoteSnapshot>>,
    pushed: Mutex<Vec<UserDataDocument>>,
    listener_tx: Mutex<Option<mpsc::Sender<ListenerEvent>>>,
}

impl MockRemote {
    /// Creates a new mock with no snapshot and no scripted failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts identity resolution to fail.
    pub fn fail_identity(&self, fail: bool) {
        self.fail_identity.store(fail, Ordering::SeqCst);
    }

    /// Scripts pushes to fail.
    pub fn fail_push(&self, fail: bool) {
        self.fail_push.store(fail, Ordering::SeqCst);
    }

    /// Scripts pulls to fail.
    pub fn fail_pull(&self, fail: bool) {
        self.fail_pull.store(fail, Ordering::SeqCst);
    }

    /// Scripts subscription establishment to fail.
    pub fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Seeds the stored snapshot, as if another device had pushed `doc`.
    pub fn seed_snapshot(&self, doc: &UserDataDocument) {
        *self.snapshot.lock() = Some(RemoteSnapshot::of(doc));
    }

    /// The currently stored snapshot.
    pub fn snapshot(&self) -> Option<RemoteSnapshot> {
        self.snapshot.lock().clone()
    }

    /// Every document pushed so far, in order.
    pub fn pushed(&self) -> Vec<UserDataDocument> {
        self.pushed.lock().clone()
    }

    /// How many identity issuance requests reached the backend.
    pub fn issuance_count(&self) -> u64 {
        self.issuance_count.load(Ordering::SeqCst)
    }

    /// Delivers a change event to the active subscription, as the
    /// backend would after any client's write.
    pub fn emit_change(&self, doc: &UserDataDocument) {
        let snapshot = RemoteSnapshot::of(doc);
        *self.snapshot.lock() = Some(snapshot.clone());
        self.emit(ListenerEvent::Changed(snapshot));
    }

    /// Delivers a transport error event to the active subscription.
    pub fn emit_error(&self, message: impl Into<String>) {
        self.emit(ListenerEvent::TransportError(message.into()));
    }

    fn emit(&self, event: ListenerEvent) {
        if let Some(tx) = self.listener_tx.lock().as_ref() {
            // A full or closed channel means the consumer is gone; the
            // event is dropped like any missed notification.
            let _ = tx.try_send(event);
        }
    }
}

#[async_trait]
impl IdentityProvider for MockRemote {
    async fn resolve_identity(&self) -> RemoteResult<Identity> {
        if self.fail_identity.load(Ordering::SeqCst) {
            return Err(RemoteError::IdentityUnavailable(
                "mock backend unreachable".into(),
            ));
        }
        self.issuance_count.fetch_add(1, Ordering::SeqCst);
        Ok(Identity::new("mock-user"))
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn push(&self, _identity: &Identity, doc: &UserDataDocument) -> RemoteResult<()> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(RemoteError::WriteFailed("mock push failure".into()));
        }
        *self.snapshot.lock() = Some(RemoteSnapshot::of(doc));
        self.pushed.lock().push(doc.clone());
        Ok(())
    }

    async fn pull(&self, _identity: &Identity) -> RemoteResult<Option<RemoteSnapshot>> {
        if self.fail_pull.load(Ordering::SeqCst) {
            return Err(RemoteError::ReadFailed("mock pull failure".into()));
        }
        Ok(self.snapshot.lock().clone())
    }
}

#[async_trait]
impl ChangeListener for MockRemote {
    async fn subscribe(&self, _identity: &Identity) -> RemoteResult<(ChangeStream, Subscription)> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(RemoteError::SubscriptionFailed("mock refuses".into()));
        }
        let (tx, rx) = mpsc::channel(16);
        *self.listener_tx.lock() = Some(tx);
        Ok((rx, Subscription::noop()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_captures_and_stores() {
        let remote = MockRemote::new();
        let identity = remote.resolve_identity().await.unwrap();

        let mut doc = UserDataDocument::default();
        doc.configure(1000.0, 10.0, 5.0);
        remote.push(&identity, &doc).await.unwrap();

        assert_eq!(remote.pushed().len(), 1);
        assert!(remote.snapshot().unwrap().user_data.content_equals(&doc));
    }

    #[tokio::test]
    async fn scripted_identity_failure() {
        let remote = MockRemote::new();
        remote.fail_identity(true);

        let result = remote.resolve_identity().await;
        assert!(matches!(result, Err(RemoteError::IdentityUnavailable(_))));
        assert_eq!(remote.issuance_count(), 0);
    }

    #[tokio::test]
    async fn pull_distinguishes_absent_from_failed() {
        let remote = MockRemote::new();
        let identity = remote.resolve_identity().await.unwrap();

        assert!(remote.pull(&identity).await.unwrap().is_none());

        remote.fail_pull(true);
        assert!(matches!(
            remote.pull(&identity).await,
            Err(RemoteError::ReadFailed(_))
        ));
    }

    #[tokio::test]
    async fn emitted_changes_reach_the_subscription() {
        let remote = MockRemote::new();
        let identity = remote.resolve_identity().await.unwrap();
        let (mut stream, _subscription) = remote.subscribe(&identity).await.unwrap();

        let doc = UserDataDocument::default();
        remote.emit_change(&doc);

        match stream.recv().await.unwrap() {
            ListenerEvent::Changed(snapshot) => {
                assert!(snapshot.user_data.content_equals(&doc));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_errors_do_not_close_the_stream() {
        let remote = MockRemote::new();
        let identity = remote.resolve_identity().await.unwrap();
        let (mut stream, _subscription) = remote.subscribe(&identity).await.unwrap();

        remote.emit_error("flaky link");
        remote.emit_change(&UserDataDocument::default());

        assert!(matches!(
            stream.recv().await.unwrap(),
            ListenerEvent::TransportError(_)
        ));
        assert!(matches!(
            stream.recv().await.unwrap(),
            ListenerEvent::Changed(_)
        ));
    }
}
