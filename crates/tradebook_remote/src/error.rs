//! Error types for remote operations.

use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur against the remote tier.
///
/// None of these propagate to the application layer: identity failure
/// degrades the session to local-only, and push/pull failures are logged
/// and superseded by the next periodic push.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Anonymous identity issuance failed; the backend is unreachable.
    ///
    /// Recoverable by retry in a later session. The current session must
    /// keep working in local-only mode.
    #[error("identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// A push failed (network, permission, quota).
    ///
    /// Not retried immediately; the next periodic push carries current
    /// state. The local write that preceded the push is never rolled
    /// back.
    #[error("remote write failed: {0}")]
    WriteFailed(String),

    /// A pull failed in transit.
    ///
    /// Must not be treated as "no remote record exists".
    #[error("remote read failed: {0}")]
    ReadFailed(String),

    /// A change subscription could not be established.
    #[error("subscription failed: {0}")]
    SubscriptionFailed(String),
}

impl RemoteError {
    /// Returns true if a later identical attempt can succeed without
    /// operator intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RemoteError::WriteFailed(_)
                | RemoteError::ReadFailed(_)
                | RemoteError::SubscriptionFailed(_)
        )
    }
}
