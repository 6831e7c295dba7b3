//! Identity type and provider trait.

use crate::error::RemoteResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-installation credential keying all remote storage.
///
/// Issued anonymously on first launch, reused thereafter, never rotated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Wraps a raw identity string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Establishes the stable anonymous identity for this installation.
///
/// # Contract
///
/// - At most one issuance request is in flight at a time
/// - A previously resolved identity is returned immediately without a
///   further backend round-trip; the result is cached for the process
///   lifetime
/// - Failure is [`RemoteError::IdentityUnavailable`]: callers degrade to
///   local-only operation, they do not abort
///
/// [`RemoteError::IdentityUnavailable`]: crate::RemoteError::IdentityUnavailable
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the identity for this installation.
    async fn resolve_identity(&self) -> RemoteResult<Identity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_displays_raw_value() {
        let identity = Identity::new("user-123");
        assert_eq!(identity.to_string(), "user-123");
        assert_eq!(identity.as_str(), "user-123");
    }

    #[test]
    fn identity_equality() {
        assert_eq!(Identity::new("a"), Identity::new("a"));
        assert_ne!(Identity::new("a"), Identity::new("b"));
    }
}
