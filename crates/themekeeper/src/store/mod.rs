//! Origin-scoped key/value storage for the persisted preference.
//!
//! This module provides:
//!
//! - [`PreferenceStore`]: The storage seam the controller writes through
//! - [`MemoryStore`]: In-memory store that can simulate disabled or full storage
//! - [`FileStore`]: Durable JSON store shared by every page of every origin
//! - [`migrate_legacy`]: Folds the old `site_dark_mode` flag into `theme`
//!
//! Writes are last-write-wins; there is no conflict detection.

mod error;
mod file;
mod memory;
mod migrate;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::{Access, MemoryStore};
pub use migrate::migrate_legacy;

/// Key/value storage for string preferences.
pub trait PreferenceStore {
    /// Reads a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a value. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
