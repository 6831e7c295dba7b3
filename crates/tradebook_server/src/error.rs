//! Error types for the reference store.

use thiserror::Error;

/// Result type for store operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors the reference store can report.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The store is simulating an outage; every operation fails.
    #[error("document store unreachable")]
    Unreachable,
}
