//! Owned application state.

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::warn;
use tradebook_model::{ModelResult, UserDataDocument};
use tradebook_store::LocalStore;

/// The application's in-memory document plus its local slot.
///
/// There is exactly one mutation entry point, [`AppState::mutate`]: it
/// applies the change, saves the whole document to the local store in
/// the same turn, and bumps a revision the engine observes for its
/// coalesced push. Reads within the session always see the latest state.
///
/// The sync subsystem never mutates the document directly — the one
/// exception is [`AppState::replace`], the whole-document state-replace
/// used after adopting a remote copy. A mutation racing a replace is
/// last-write-loses.
pub struct AppState<S: LocalStore> {
    store: S,
    doc: RwLock<UserDataDocument>,
    had_local: bool,
    revision: watch::Sender<u64>,
}

impl<S: LocalStore> AppState<S> {
    /// Opens the state over a local store, loading the stored document
    /// or starting from the default one.
    pub fn open(store: S) -> Self {
        let loaded = store.load();
        let had_local = loaded.is_some();
        let (revision, _) = watch::channel(0);
        Self {
            store,
            doc: RwLock::new(loaded.unwrap_or_default()),
            had_local,
            revision,
        }
    }

    /// Whether a local document existed when the state was opened.
    pub fn had_local_document(&self) -> bool {
        self.had_local
    }

    /// A clone of the current document.
    pub fn document(&self) -> UserDataDocument {
        self.doc.read().clone()
    }

    /// Canonical JSON of the current document.
    pub fn canonical_json(&self) -> String {
        self.doc.read().canonical_json()
    }

    /// Applies a mutation, saves locally, and signals the engine.
    ///
    /// The mutation sees a scratch copy; a rejected mutation leaves both
    /// memory and the slot untouched. A *store* failure, by contrast, is
    /// logged and the mutation still stands — local-tier trouble never
    /// blocks the user action that triggered it.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut UserDataDocument) -> ModelResult<T>,
    ) -> ModelResult<T> {
        let mut guard = self.doc.write();
        let mut next = guard.clone();
        let value = f(&mut next)?;

        if let Err(err) = self.store.save(&next) {
            warn!(%err, "local save failed, keeping in-memory state");
        }
        *guard = next;
        drop(guard);

        self.revision.send_modify(|r| *r += 1);
        Ok(value)
    }

    /// Whole-document state replace: swap memory, save locally, signal.
    ///
    /// Used after pulling a remote document at startup and after a
    /// confirmed reload. Derived views must be rebuilt from the revision
    /// signal; nothing is hot-patched.
    pub fn replace(&self, doc: UserDataDocument) {
        if let Err(err) = self.store.save(&doc) {
            warn!(%err, "local save failed during state replace");
        }
        *self.doc.write() = doc;
        self.revision.send_modify(|r| *r += 1);
    }

    /// Writes a document to the local slot without touching memory.
    ///
    /// The externally-applied-change path uses this: the slot is
    /// overwritten first, the running state only follows once the user
    /// confirms the reload.
    pub fn write_local(&self, doc: &UserDataDocument) {
        if let Err(err) = self.store.save(doc) {
            warn!(%err, "local save of remote document failed");
        }
    }

    /// Re-reads the document currently in the local slot.
    pub fn load_local(&self) -> Option<UserDataDocument> {
        self.store.load()
    }

    /// The raw serialized slot text.
    pub fn local_raw(&self) -> Option<String> {
        self.store.raw()
    }

    /// Current revision counter.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// A receiver observing revision bumps.
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebook_model::ModelError;
    use tradebook_store::{LocalStore, MemoryStore};

    #[test]
    fn open_on_empty_store_starts_default() {
        let state = AppState::open(MemoryStore::new());
        assert!(!state.had_local_document());
        assert!(!state.document().setup.configured);
    }

    #[test]
    fn open_on_populated_store_loads_it() {
        let store = MemoryStore::new();
        let mut doc = UserDataDocument::default();
        doc.configure(1000.0, 10.0, 5.0);
        store.save(&doc).unwrap();

        let state = AppState::open(store);
        assert!(state.had_local_document());
        assert!(state.document().content_equals(&doc));
    }

    #[test]
    fn mutate_saves_in_the_same_turn() {
        let state = AppState::open(MemoryStore::new());

        state
            .mutate(|doc| {
                doc.configure(1000.0, 10.0, 5.0);
                Ok(())
            })
            .unwrap();

        // The slot already holds the mutated document.
        let stored = state.load_local().unwrap();
        assert!(stored.setup.configured);
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn rejected_mutation_changes_nothing() {
        let state = AppState::open(MemoryStore::new());

        let result = state.mutate(|doc| doc.add_entry("missing", tradebook_model::Period::Morning, tradebook_model::TradeResult::Win, 10.0));
        assert!(matches!(result, Err(ModelError::DayNotFound(_))));

        assert!(state.load_local().is_none());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn replace_swaps_memory_and_slot() {
        let state = AppState::open(MemoryStore::new());
        let mut incoming = UserDataDocument::default();
        incoming.configure(5000.0, 20.0, 10.0);

        state.replace(incoming.clone());

        assert!(state.document().content_equals(&incoming));
        assert!(state.load_local().unwrap().content_equals(&incoming));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn write_local_leaves_memory_alone() {
        let state = AppState::open(MemoryStore::new());
        let mut incoming = UserDataDocument::default();
        incoming.configure(5000.0, 20.0, 10.0);

        state.write_local(&incoming);

        assert!(!state.document().setup.configured);
        assert!(state.load_local().unwrap().setup.configured);
        assert_eq!(state.revision(), 0);
    }

    #[tokio::test]
    async fn revision_signal_fires_per_mutation() {
        let state = AppState::open(MemoryStore::new());
        let mut revisions = state.subscribe_revisions();

        state
            .mutate(|doc| {
                doc.configure(1.0, 1.0, 1.0);
                Ok(())
            })
            .unwrap();

        revisions.changed().await.unwrap();
        assert_eq!(*revisions.borrow(), 1);
    }
}
