//! Toggle control discovery and state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Id given to a synthesized control.
pub const DEFAULT_CONTROL_ID: &str = "theme-toggle";

const DEFAULT_CONTROL_CLASS: &str = "theme-toggle";

// Fixed bottom-right, circular, icon only.
const DEFAULT_CONTROL_STYLE: &str = "position:fixed;bottom:20px;right:20px;z-index:9999;\
width:48px;height:48px;border-radius:50%;border:1px solid rgba(127,127,127,0.4);\
display:flex;align-items:center;justify-content:center;font-size:22px;line-height:1;\
cursor:pointer;background:var(--theme-toggle-bg,#fff);box-shadow:0 2px 8px rgba(0,0,0,0.2)";

/// A CSS-like selector used to discover an existing toggle control.
///
/// Supported forms: `tag`, `#id`, `.class`, `[attr]` and `[attr=value]` (the
/// value may be single- or double-quoted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ControlSelector {
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

/// Selectors tried, in order, before a control is synthesized.
pub fn default_selectors() -> Vec<ControlSelector> {
    vec![
        ControlSelector::Id(DEFAULT_CONTROL_ID.to_string()),
        ControlSelector::Id("themeToggle".to_string()),
        ControlSelector::Id("themeToggleBtn".to_string()),
        ControlSelector::Id("dark-mode-toggle".to_string()),
        ControlSelector::Id("darkModeToggle".to_string()),
        ControlSelector::Attribute {
            name: "data-theme-toggle".to_string(),
            value: None,
        },
        ControlSelector::Class(DEFAULT_CONTROL_CLASS.to_string()),
    ]
}

/// Containers a synthesized control is appended to, in order, before it
/// falls back to floating over the body.
pub fn default_containers() -> Vec<ControlSelector> {
    vec![
        ControlSelector::Class("header".to_string()),
        ControlSelector::Tag("header".to_string()),
    ]
}

/// Error returned for selector strings outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported control selector '{0}' (expected tag, #id, .class, [attr] or [attr=value])")]
pub struct ParseSelectorError(pub String);

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

impl FromStr for ControlSelector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseSelectorError(s.to_string());

        if let Some(id) = trimmed.strip_prefix('#') {
            return is_ident(id)
                .then(|| ControlSelector::Id(id.to_string()))
                .ok_or_else(err);
        }
        if let Some(class) = trimmed.strip_prefix('.') {
            return is_ident(class)
                .then(|| ControlSelector::Class(class.to_string()))
                .ok_or_else(err);
        }
        if let Some(body) = trimmed.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name.trim(), Some(unquote(value).to_string())),
                None => (body.trim(), None),
            };
            return is_ident(name)
                .then(|| ControlSelector::Attribute {
                    name: name.to_string(),
                    value,
                })
                .ok_or_else(err);
        }
        is_ident(trimmed)
            .then(|| ControlSelector::Tag(trimmed.to_ascii_lowercase()))
            .ok_or_else(err)
    }
}

impl TryFrom<String> for ControlSelector {
    type Error = ParseSelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ControlSelector> for String {
    fn from(selector: ControlSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for ControlSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSelector::Tag(tag) => f.write_str(tag),
            ControlSelector::Id(id) => write!(f, "#{}", id),
            ControlSelector::Class(class) => write!(f, ".{}", class),
            ControlSelector::Attribute { name, value: None } => write!(f, "[{}]", name),
            ControlSelector::Attribute {
                name,
                value: Some(value),
            } => write!(f, "[{}=\"{}\"]", name, value),
        }
    }
}

/// Opaque reference to a control element on a particular page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlHandle(pub(crate) usize);

impl ControlHandle {
    /// Creates a handle from a page-specific index.
    ///
    /// Only meaningful to the [`Page`](super::Page) implementation that issued it.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// What a toggle control shows for the applied theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub glyph: String,
    pub label: String,
    pub title: String,
    /// Mirrors `aria-pressed`: true while dark.
    pub pressed: bool,
}

impl ControlState {
    pub fn for_theme(theme: Theme) -> Self {
        Self {
            glyph: theme.glyph().to_string(),
            label: theme.toggle_label().to_string(),
            title: theme.toggle_label().to_string(),
            pressed: theme.is_dark(),
        }
    }
}

/// The control inserted when a page has none of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleControl {
    pub id: String,
    pub class: String,
    /// Inline style; empty for a control placed inside a container.
    pub style: String,
    pub state: ControlState,
}

impl ToggleControl {
    /// The default fixed-position, circular, icon-only button.
    pub fn synthesized(theme: Theme) -> Self {
        Self {
            id: DEFAULT_CONTROL_ID.to_string(),
            class: DEFAULT_CONTROL_CLASS.to_string(),
            style: DEFAULT_CONTROL_STYLE.to_string(),
            state: ControlState::for_theme(theme),
        }
    }

    /// The same button without positioning, for appending to a header.
    pub fn docked(theme: Theme) -> Self {
        Self {
            style: String::new(),
            ..Self::synthesized(theme)
        }
    }

    pub fn is_floating(&self) -> bool {
        !self.style.is_empty()
    }
}
