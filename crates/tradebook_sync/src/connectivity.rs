//! Connectivity tracking.

use tokio::sync::watch;
use tracing::info;

/// Tracks online/offline state and publishes transitions.
///
/// The engine consults this before every remote leg: while offline,
/// pushes and pulls are *skipped* — not queued, not errored. No replay
/// queue exists; the first periodic push after regaining connectivity
/// naturally carries current state.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    state: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial state.
    pub fn new(online: bool) -> Self {
        let (state, _) = watch::channel(online);
        Self { state }
    }

    /// Current connectivity.
    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Records a connectivity transition. No-op transitions are not
    /// published.
    pub fn set_online(&self, online: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "connectivity changed");
        }
    }

    /// A receiver observing connectivity transitions.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
