//! Notifications and results produced by a toggle.

use serde::Serialize;

use crate::theme::Theme;

/// Payload of the `themeChanged` notification.
///
/// Serializes as `{"theme": "dark"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeChanged {
    pub theme: Theme,
}

/// What a single [`toggle`](super::ThemeController::toggle) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// Theme shown before the toggle.
    pub previous: Theme,
    /// Theme applied by the toggle.
    pub theme: Theme,
    /// Whether the new preference reached storage.
    pub persisted: bool,
    /// Whether a page reload was scheduled.
    pub reload_scheduled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_changed_payload_shape() {
        let payload = serde_json::to_value(ThemeChanged { theme: Theme::Dark }).unwrap();
        assert_eq!(payload, serde_json::json!({ "theme": "dark" }));
    }
}
