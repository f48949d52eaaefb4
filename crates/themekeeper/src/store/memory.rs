//! In-memory preference store.

use std::collections::HashMap;

use super::{PreferenceStore, StoreError};

/// What a [`MemoryStore`] allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    ReadWrite,
    /// Reads succeed, writes and removals fail (e.g. storage quota exhausted).
    ReadOnly,
    /// Every operation fails (e.g. storage disabled by the user agent).
    Unavailable,
}

/// A preference store held in memory.
///
/// # Example
///
/// ```rust
/// use themekeeper::{MemoryStore, PreferenceStore};
///
/// let mut store = MemoryStore::new().with_entry("theme", "dark");
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
///
/// store.set("theme", "light").unwrap();
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    access: Access,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every operation fails.
    pub fn unavailable() -> Self {
        Self {
            access: Access::Unavailable,
            ..Self::default()
        }
    }

    /// Adds an entry, returning the store for chaining.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Changes what the store allows from now on.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn set_access(&mut self, access: Access) {
        self.access = access;
    }

    /// Number of successful `set` calls since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        match self.access {
            Access::ReadWrite => Ok(()),
            Access::ReadOnly => Err(StoreError::ReadOnly),
            Access::Unavailable => Err(StoreError::Unavailable),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.access == Access::Unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("theme").unwrap().is_none());
    }

    #[test]
    fn test_set_counts_writes() {
        let mut store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.remove("nope").is_ok());
    }

    #[test]
    fn test_read_only_allows_reads_only() {
        let mut store = MemoryStore::new()
            .with_entry("theme", "dark")
            .with_access(Access::ReadOnly);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(matches!(store.set("theme", "light"), Err(StoreError::ReadOnly)));
        assert!(matches!(store.remove("theme"), Err(StoreError::ReadOnly)));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_unavailable_fails_everything() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.get("theme"), Err(StoreError::Unavailable)));
        assert!(matches!(store.set("theme", "dark"), Err(StoreError::Unavailable)));
    }
}
