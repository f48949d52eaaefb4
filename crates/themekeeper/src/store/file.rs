//! Durable JSON-file preference store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PreferenceStore, StoreError};

type Document = BTreeMap<String, BTreeMap<String, String>>;

/// A preference store persisted to a JSON file.
///
/// One file holds the preferences of every origin, keyed by the origin's
/// ASCII serialization:
///
/// ```json
/// { "https://example.com": { "theme": "dark" } }
/// ```
///
/// Every operation re-reads the file, so several stores (or processes)
/// pointing at the same path observe each other's writes. Concurrent writers
/// race; the last write wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    origin: String,
}

impl FileStore {
    /// Creates a store for `origin` backed by the file at `path`.
    ///
    /// The file is not touched until the first operation.
    pub fn new(path: impl Into<PathBuf>, origin: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: origin.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Document::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(doc).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let doc = self.load()?;
        Ok(doc
            .get(&self.origin)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut doc = self.load()?;
        doc.entry(self.origin.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.save(&doc)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut doc = self.load()?;
        let removed = match doc.get_mut(&self.origin) {
            Some(entries) => entries.remove(key).is_some(),
            None => false,
        };
        if !removed {
            return Ok(());
        }
        if doc.get(&self.origin).is_some_and(|entries| entries.is_empty()) {
            doc.remove(&self.origin);
        }
        self.save(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ORIGIN: &str = "https://example.com";

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"), ORIGIN);
        assert!(store.get("theme").unwrap().is_none());
    }

    #[test]
    fn test_set_creates_parent_dirs_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/prefs.json");
        let mut store = FileStore::new(&path, ORIGIN);
        store.set("theme", "dark").unwrap();

        let reopened = FileStore::new(&path, ORIGIN);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_origins_are_isolated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut a = FileStore::new(&path, "https://a.example");
        let b = FileStore::new(&path, "https://b.example");

        a.set("theme", "dark").unwrap();
        assert!(b.get("theme").unwrap().is_none());
    }

    #[test]
    fn test_instances_share_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut first = FileStore::new(&path, ORIGIN);
        let mut second = FileStore::new(&path, ORIGIN);

        first.set("theme", "dark").unwrap();
        assert_eq!(second.get("theme").unwrap().as_deref(), Some("dark"));
        second.set("theme", "light").unwrap();
        assert_eq!(first.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_remove_drops_empty_origin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut store = FileStore::new(&path, ORIGIN);
        store.set("site_dark_mode", "1").unwrap();
        store.remove("site_dark_mode").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains(ORIGIN));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path, ORIGIN);
        assert!(matches!(store.get("theme"), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_empty_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::new(&path, ORIGIN);
        assert!(store.get("theme").unwrap().is_none());
    }
}
