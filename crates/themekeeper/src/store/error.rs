//! Storage errors.

use std::path::PathBuf;

/// Error returned by a [`PreferenceStore`](super::PreferenceStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage is disabled or inaccessible in this environment
    #[error("preference storage is unavailable")]
    Unavailable,
    /// Storage can be read but refuses writes
    #[error("preference storage is read-only")]
    ReadOnly,
    /// The backing file could not be read or written
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The backing file does not hold a valid preference document
    #[error("corrupt preference file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_names_path() {
        let err = StoreError::Io {
            path: PathBuf::from("/tmp/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/prefs.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_unavailable_display() {
        assert_eq!(
            StoreError::Unavailable.to_string(),
            "preference storage is unavailable"
        );
    }
}
