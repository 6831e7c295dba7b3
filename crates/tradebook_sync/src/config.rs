//! Configuration for the reconciliation engine.

use std::time::Duration;

/// Configuration for sync behavior.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Cadence of the periodic re-push. The push happens whether or not
    /// anything changed; an unchanged document is an idempotent no-op on
    /// the remote.
    pub push_interval: Duration,
    /// Quiet window after a mutation before the triggered push fires, so
    /// bursts of edits coalesce into one push.
    pub coalesce_window: Duration,
}

impl SyncConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            push_interval: Duration::from_secs(30),
            coalesce_window: Duration::from_secs(2),
        }
    }

    /// Sets the periodic re-push interval.
    pub fn with_push_interval(mut self, interval: Duration) -> Self {
        self.push_interval = interval;
        self
    }

    /// Sets the mutation coalescing window.
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
