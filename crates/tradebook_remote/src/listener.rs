//! Change listener trait and subscription handle.

use crate::error::RemoteResult;
use crate::identity::Identity;
use crate::snapshot::RemoteSnapshot;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An event delivered on a change subscription.
#[derive(Debug, Clone)]
pub enum ListenerEvent {
    /// The remote snapshot for the subscribed identity was written, by
    /// any client — including this process's own pushes.
    Changed(RemoteSnapshot),
    /// The underlying transport reported an error. The subscription
    /// stays armed; consumers log and keep listening.
    TransportError(String),
}

/// Receiving side of a change subscription.
pub type ChangeStream = mpsc::Receiver<ListenerEvent>;

/// Subscribes to remote-side writes of an identity's snapshot.
///
/// Delivery is asynchronous, typically sub-second, and includes
/// self-originated writes; consumers de-duplicate by comparing content.
#[async_trait]
pub trait ChangeListener: Send + Sync {
    /// Opens a subscription for the identity's snapshot.
    ///
    /// Returns the event stream and a handle that cancels delivery.
    async fn subscribe(&self, identity: &Identity) -> RemoteResult<(ChangeStream, Subscription)>;
}

/// Cancelation handle for a change subscription.
///
/// `cancel` is idempotent and safe to call from any thread; after it
/// returns no further events are forwarded. Dropping the handle does
/// *not* cancel — teardown is explicit.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

struct SubscriptionInner {
    cancelled: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    /// Wraps the forwarding task backing a subscription.
    pub fn new(task: JoinHandle<()>) -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                cancelled: AtomicBool::new(false),
                task: Mutex::new(Some(task)),
            }),
        }
    }

    /// A subscription with nothing to cancel, for test doubles.
    pub fn noop() -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                cancelled: AtomicBool::new(false),
                task: Mutex::new(None),
            }),
        }
    }

    /// Stops event delivery. Idempotent.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self.inner.task.lock().take() {
            task.abort();
        }
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
