//! The [`Theme`] value and its wire form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A presentation mode for the page.
///
/// The wire form (storage values, event payloads, config files) is the
/// lowercase name: `"light"` or `"dark"`.
///
/// # Example
///
/// ```rust
/// use themekeeper::Theme;
///
/// let theme: Theme = "Dark".parse().unwrap();
/// assert_eq!(theme, Theme::Dark);
/// assert_eq!(theme.toggled(), Theme::Light);
/// assert_eq!(theme.to_string(), "dark");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the wire name of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Icon shown on the toggle control while this theme is applied.
    ///
    /// The icon advertises the mode a click switches to: a moon while light,
    /// a sun while dark.
    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Light => "\u{1F319}",
            Theme::Dark => "\u{2600}\u{FE0F}",
        }
    }

    /// Label and title text for the toggle control while this theme is applied.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognized theme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme '{0}' (expected 'light' or 'dark')")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("light") {
            Ok(Theme::Light)
        } else if trimmed.eq_ignore_ascii_case("dark") {
            Ok(Theme::Dark)
        } else {
            Err(ParseThemeError(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_toggled_is_involution() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_ne!(theme.toggled(), theme);
            assert_eq!(theme.toggled().toggled(), theme);
        }
    }

    #[test]
    fn test_parse_accepts_case_and_whitespace() {
        assert_eq!(" LIGHT ".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "sepia".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("sepia"));
        assert!("1".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_glyph_advertises_next_mode() {
        assert_eq!(Theme::Light.glyph(), "🌙");
        assert_eq!(Theme::Dark.glyph(), "☀️");
        assert!(Theme::Light.toggle_label().contains("dark"));
        assert!(Theme::Dark.toggle_label().contains("light"));
    }
}
