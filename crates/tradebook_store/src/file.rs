//! File-based store for persistent sessions.

use crate::error::StoreResult;
use crate::store::LocalStore;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use tradebook_model::UserDataDocument;

/// A file-backed document slot.
///
/// The slot is one file holding the whole-document JSON. Data survives
/// process restarts.
///
/// # Durability
///
/// `save` writes a sibling temp file, fsyncs it, then renames it over the
/// slot. A crash at any point leaves either the previous document or the
/// new one, never a torn write.
///
/// # Thread Safety
///
/// This store is thread-safe; an internal lock serializes writers.
///
/// # Example
///
/// ```no_run
/// use tradebook_store::{LocalStore, FileStore};
/// use tradebook_model::UserDataDocument;
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("tradebook.json")).unwrap();
/// store.save(&UserDataDocument::default()).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a file store at the given path.
    ///
    /// The file does not have to exist yet; an absent file is an empty
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory exists but is not
    /// accessible.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Opens a file store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LocalStore for FileStore {
    fn load(&self) -> Option<UserDataDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(%err, path = %self.path.display(), "local slot unreadable, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(%err, path = %self.path.display(), "local slot does not parse, treating as absent");
                None
            }
        }
    }

    fn save(&self, doc: &UserDataDocument) -> StoreResult<()> {
        let text = serde_json::to_string(doc)?;
        let _guard = self.write_lock.lock();

        let temp = self.temp_path();
        {
            let mut file: File = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn raw(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_slot() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("doc.json")).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("doc.json")).unwrap();

        let mut doc = UserDataDocument::default();
        doc.configure(1000.0, 10.0, 5.0);
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut doc = UserDataDocument::default();
        doc.configure(250.0, 8.0, 4.0);

        {
            let store = FileStore::open(&path).unwrap();
            store.save(&doc).unwrap();
        }
        {
            let store = FileStore::open(&path).unwrap();
            assert_eq!(store.load().unwrap(), doc);
        }
    }

    #[test]
    fn corrupt_file_loads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "definitely not a document").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_replaces_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "garbage").unwrap();

        let store = FileStore::open(&path).unwrap();
        let doc = UserDataDocument::default();
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let store = FileStore::open(&path).unwrap();
        store.save(&UserDataDocument::default()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("doc.json");

        let store = FileStore::open_with_create_dirs(&path).unwrap();
        store.save(&UserDataDocument::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn raw_matches_saved_text() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("doc.json")).unwrap();

        let doc = UserDataDocument::default();
        store.save(&doc).unwrap();

        assert_eq!(store.raw().unwrap(), doc.canonical_json());
    }
}
