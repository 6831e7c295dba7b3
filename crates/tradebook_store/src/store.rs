//! Local store trait definition.

use crate::error::StoreResult;
use tradebook_model::UserDataDocument;

/// A durable local slot for the user-data document.
///
/// Stores hold exactly one value: the serialized whole document. They are
/// the synchronous leg of every mutation — the caller writes here first,
/// in the same turn as the mutation, and only then lets the asynchronous
/// remote push happen.
///
/// # Invariants
///
/// - `load` returns exactly the document most recently `save`d, or `None`
/// - A corrupt slot loads as `None`; parse failures never propagate
/// - `save` is durable before it returns
/// - Stores must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait LocalStore: Send + Sync {
    /// Loads the stored document.
    ///
    /// `None` means the slot is empty *or* holds text that does not parse
    /// as a document; the two are deliberately indistinguishable to
    /// callers.
    fn load(&self) -> Option<UserDataDocument>;

    /// Saves the document, replacing the previous slot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    /// Callers log and continue; a failed local save never aborts the
    /// mutation that triggered it.
    fn save(&self, doc: &UserDataDocument) -> StoreResult<()>;

    /// Returns the raw serialized slot text, if any.
    ///
    /// Used for content-equality checks against incoming remote documents
    /// without a parse round-trip.
    fn raw(&self) -> Option<String>;
}
