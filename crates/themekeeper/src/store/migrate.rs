//! Migration of the legacy `site_dark_mode` flag.

use tracing::{debug, info, warn};

use super::{PreferenceStore, StoreError};
use crate::theme::Theme;

fn legacy_theme(raw: &str) -> Option<Theme> {
    match raw.trim() {
        "1" => Some(Theme::Dark),
        "0" => Some(Theme::Light),
        _ => None,
    }
}

/// Folds a legacy `'1'`/`'0'` flag stored under `legacy_key` into `key`.
///
/// - `key` absent, legacy flag recognized: `key` is written from the flag and
///   the flag removed. Returns the migrated theme.
/// - `key` present: the flag, if any, is removed; `key` is left untouched.
/// - Unrecognized flag values are removed and ignored.
///
/// Returns `Ok(None)` when nothing was migrated. Only read failures are
/// errors: a store that refuses the write or the removal still yields the
/// flag's theme, and the flag is migrated again on a later load.
pub fn migrate_legacy<S>(store: &mut S, key: &str, legacy_key: &str) -> Result<Option<Theme>, StoreError>
where
    S: PreferenceStore + ?Sized,
{
    let Some(raw) = store.get(legacy_key)? else {
        return Ok(None);
    };

    if store.get(key)?.is_some() {
        debug!(legacy_key, "dropping legacy flag shadowed by current preference");
        discard(store, legacy_key);
        return Ok(None);
    }

    let migrated = legacy_theme(&raw);
    match migrated {
        Some(theme) => match store.set(key, theme.as_str()) {
            Ok(()) => {
                info!(legacy_key, %theme, "migrated legacy theme preference");
                discard(store, legacy_key);
            }
            Err(e) => warn!(error = %e, legacy_key, %theme, "could not persist migrated theme"),
        },
        None => {
            debug!(legacy_key, value = %raw, "discarding unrecognized legacy flag");
            discard(store, legacy_key);
        }
    }
    Ok(migrated)
}

fn discard<S: PreferenceStore + ?Sized>(store: &mut S, legacy_key: &str) {
    if let Err(e) = store.remove(legacy_key) {
        warn!(error = %e, legacy_key, "could not remove legacy theme flag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Access, MemoryStore};

    #[test]
    fn test_no_legacy_flag_is_noop() {
        let mut store = MemoryStore::new();
        assert_eq!(migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_dark_flag_migrates() {
        let mut store = MemoryStore::new().with_entry("site_dark_mode", "1");
        let migrated = migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap();

        assert_eq!(migrated, Some(Theme::Dark));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(store.get("site_dark_mode").unwrap().is_none());
    }

    #[test]
    fn test_legacy_light_flag_migrates() {
        let mut store = MemoryStore::new().with_entry("site_dark_mode", "0");
        let migrated = migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap();
        assert_eq!(migrated, Some(Theme::Light));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_current_key_wins_over_legacy() {
        let mut store = MemoryStore::new()
            .with_entry("theme", "light")
            .with_entry("site_dark_mode", "1");
        let migrated = migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap();

        assert_eq!(migrated, None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        assert!(store.get("site_dark_mode").unwrap().is_none());
    }

    #[test]
    fn test_garbage_legacy_flag_is_discarded() {
        let mut store = MemoryStore::new().with_entry("site_dark_mode", "yes");
        let migrated = migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap();

        assert_eq!(migrated, None);
        assert!(store.get("theme").unwrap().is_none());
        assert!(store.get("site_dark_mode").unwrap().is_none());
    }

    #[test]
    fn test_read_only_store_still_yields_legacy_theme() {
        let mut store = MemoryStore::new()
            .with_entry("site_dark_mode", "1")
            .with_access(Access::ReadOnly);
        let migrated = migrate_legacy(&mut store, "theme", "site_dark_mode").unwrap();

        assert_eq!(migrated, Some(Theme::Dark));
        assert!(store.get("theme").unwrap().is_none());
        assert_eq!(store.get("site_dark_mode").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_unavailable_store_reports_error() {
        let mut store = MemoryStore::unavailable();
        assert!(migrate_legacy(&mut store, "theme", "site_dark_mode").is_err());
    }
}
