//! In-memory store for testing.

use crate::error::StoreResult;
use crate::store::LocalStore;
use parking_lot::RwLock;
use tracing::warn;
use tradebook_model::UserDataDocument;

/// An in-memory document slot.
///
/// Holds the serialized text the way a browser key-value slot would,
/// which makes it suitable for:
/// - Unit tests
/// - Ephemeral sessions that don't need persistence
/// - Corruption scenarios, via [`MemoryStore::with_raw`]
///
/// # Example
///
/// ```rust
/// use tradebook_store::{LocalStore, MemoryStore};
/// use tradebook_model::UserDataDocument;
///
/// let store = MemoryStore::new();
/// assert!(store.load().is_none());
///
/// let doc = UserDataDocument::default();
/// store.save(&doc).unwrap();
/// assert_eq!(store.load().unwrap(), doc);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose slot already holds the given raw text.
    ///
    /// The text does not have to be a valid document; corrupt-slot
    /// behavior is exercised this way.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }

    /// Clears the slot.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}

impl LocalStore for MemoryStore {
    fn load(&self) -> Option<UserDataDocument> {
        let slot = self.slot.read();
        let raw = slot.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(%err, "local slot does not parse, treating as absent");
                None
            }
        }
    }

    fn save(&self, doc: &UserDataDocument) -> StoreResult<()> {
        let text = serde_json::to_string(doc)?;
        *self.slot.write() = Some(text);
        Ok(())
    }

    fn raw(&self) -> Option<String> {
        self.slot.read().clone()
    }
}
