//! Loopback client: the remote-tier traits against an in-process store.

use crate::store::DocumentStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;
use tradebook_model::UserDataDocument;
use tradebook_remote::{
    ChangeListener, ChangeStream, Identity, IdentityProvider, ListenerEvent, RemoteError,
    RemoteResult, RemoteSnapshot, RemoteStore, Subscription,
};

/// Capacity of the stream handed to the change-listener consumer.
const STREAM_CAPACITY: usize = 16;

/// A client wired straight to a [`DocumentStore`].
///
/// Implements [`IdentityProvider`], [`RemoteStore`] and
/// [`ChangeListener`] without network overhead — useful for integration
/// tests and for single-process deployments. Identity resolution is
/// cached for the client's lifetime and at most one issuance request is
/// in flight at a time.
pub struct LoopbackClient {
    store: Arc<DocumentStore>,
    // Also serializes issuance: the lock is held across the request.
    identity: tokio::sync::Mutex<Option<Identity>>,
}

impl LoopbackClient {
    /// Creates a client against the given store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            identity: tokio::sync::Mutex::new(None),
        }
    }

    /// The shared store this client talks to.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }
}

#[async_trait]
impl IdentityProvider for LoopbackClient {
    async fn resolve_identity(&self) -> RemoteResult<Identity> {
        let mut cached = self.identity.lock().await;
        if let Some(identity) = cached.as_ref() {
            return Ok(identity.clone());
        }

        let identity = self
            .store
            .issue_identity()
            .map_err(|e| RemoteError::IdentityUnavailable(e.to_string()))?;
        *cached = Some(identity.clone());
        Ok(identity)
    }
}

#[async_trait]
impl RemoteStore for LoopbackClient {
    async fn push(&self, identity: &Identity, doc: &UserDataDocument) -> RemoteResult<()> {
        self.store
            .upsert(identity, RemoteSnapshot::of(doc))
            .map_err(|e| RemoteError::WriteFailed(e.to_string()))
    }

    async fn pull(&self, identity: &Identity) -> RemoteResult<Option<RemoteSnapshot>> {
        self.store
            .fetch(identity)
            .map_err(|e| RemoteError::ReadFailed(e.to_string()))
    }
}

#[async_trait]
impl ChangeListener for LoopbackClient {
    async fn subscribe(&self, identity: &Identity) -> RemoteResult<(ChangeStream, Subscription)> {
        let mut feed = self
            .store
            .subscribe(identity)
            .map_err(|e| RemoteError::SubscriptionFailed(e.to_string()))?;

        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        let task = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(snapshot) => {
                        if tx.send(ListenerEvent::Changed(snapshot)).await.is_err() {
                            // Consumer dropped the stream.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        debug!(missed, "change feed lagged");
                        let message = format!("change feed lagged, {missed} writes missed");
                        if tx.send(ListenerEvent::TransportError(message)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok((rx, Subscription::new(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(initial_bank: f64) -> UserDataDocument {
        let mut doc = UserDataDocument::default();
        doc.configure(initial_bank, 10.0, 5.0);
        doc
    }

    #[tokio::test]
    async fn identity_is_cached_after_first_resolution() {
        let store = Arc::new(DocumentStore::new());
        let client = LoopbackClient::new(Arc::clone(&store));

        let first = client.resolve_identity().await.unwrap();

        // Even through an outage the cached identity keeps resolving.
        store.set_reachable(false);
        let second = client.resolve_identity().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unreachable_store_means_identity_unavailable() {
        let store = Arc::new(DocumentStore::new());
        store.set_reachable(false);
        let client = LoopbackClient::new(store);

        let result = client.resolve_identity().await;
        assert!(matches!(result, Err(RemoteError::IdentityUnavailable(_))));
    }

    #[tokio::test]
    async fn push_then_pull_roundtrips() {
        let store = Arc::new(DocumentStore::new());
        let client = LoopbackClient::new(store);
        let identity = client.resolve_identity().await.unwrap();

        let doc = configured(1000.0);
        client.push(&identity, &doc).await.unwrap();

        let snapshot = client.pull(&identity).await.unwrap().unwrap();
        assert!(snapshot.user_data.content_equals(&doc));
    }

    #[tokio::test]
    async fn own_pushes_are_delivered_to_the_subscription() {
        let store = Arc::new(DocumentStore::new());
        let client = LoopbackClient::new(store);
        let identity = client.resolve_identity().await.unwrap();

        let (mut stream, subscription) = client.subscribe(&identity).await.unwrap();

        let doc = configured(1000.0);
        client.push(&identity, &doc).await.unwrap();

        match stream.recv().await.unwrap() {
            ListenerEvent::Changed(snapshot) => {
                assert!(snapshot.user_data.content_equals(&doc));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        subscription.cancel();
    }

    #[tokio::test]
    async fn cancel_stops_delivery() {
        let store = Arc::new(DocumentStore::new());
        let client = LoopbackClient::new(Arc::clone(&store));
        let identity = client.resolve_identity().await.unwrap();

        let (mut stream, subscription) = client.subscribe(&identity).await.unwrap();
        subscription.cancel();
        // Give the aborted forwarder a chance to wind down.
        tokio::task::yield_now().await;

        client.push(&identity, &configured(1.0)).await.unwrap();
        assert!(stream.try_recv().is_err());
    }
}
