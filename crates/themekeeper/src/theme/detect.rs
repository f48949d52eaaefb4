//! Ambient color-scheme detection.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use super::Theme;

/// Function used to ask the environment which theme it prefers.
///
/// Controllers hold their own detector, so tests can substitute a fixed
/// answer or a failure without touching any shared state.
pub type ThemeDetector = fn() -> Result<Theme, DetectError>;

/// Error returned when the ambient color scheme cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("color scheme detection failed: {0}")]
pub struct DetectError(pub String);

/// Detects the operating system's light/dark setting.
pub fn system_theme() -> Result<Theme, DetectError> {
    Ok(match detect_os_theme() {
        OsThemeMode::Dark => Theme::Dark,
        OsThemeMode::Light => Theme::Light,
    })
}
