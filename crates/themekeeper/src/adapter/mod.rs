//! Presentation adapters: how a theme becomes visible on a page.
//!
//! This module provides:
//!
//! - [`PresentationAdapter`]: The contract the controller applies themes through
//! - [`ClassAdapter`], [`AttributeAdapter`], [`StylesheetAdapter`]: Stock strategies
//! - [`CompositeAdapter`]: Several strategies applied together
//! - [`AdapterSpec`]: Serializable description used by configuration
//!
//! Adapters must be idempotent: applying the same theme twice leaves the page
//! as applying it once. A missing optional stylesheet is not an error.

mod composite;
mod stock;

use serde::{Deserialize, Serialize};

use crate::page::{Page, PageError};
use crate::theme::Theme;

pub use composite::CompositeAdapter;
pub use stock::{AttributeAdapter, ClassAdapter, StylesheetAdapter};

/// Makes a page visually light or dark.
pub trait PresentationAdapter {
    /// Applies `theme` to the page.
    fn apply(&self, page: &mut dyn Page, theme: Theme) -> Result<(), PresentationError>;

    /// Reads the theme currently shown by the page, if this adapter can tell.
    fn applied(&self, page: &dyn Page) -> Option<Theme>;
}

/// Error returned when an adapter could not apply a theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// The page rejected the adapter's change
    #[error("{adapter} adapter failed: {source}")]
    Page {
        adapter: &'static str,
        #[source]
        source: PageError,
    },
    /// Some members of a composite adapter failed
    #[error("{failed} of {total} presentation adapters failed, first: {first}")]
    Partial {
        failed: usize,
        total: usize,
        first: Box<PresentationError>,
    },
}

impl PresentationError {
    pub(crate) fn page(adapter: &'static str, source: PageError) -> Self {
        PresentationError::Page { adapter, source }
    }
}

/// Configuration form of a stock adapter.
///
/// ```yaml
/// - kind: class
///   name: dark-mode
/// - kind: stylesheet
///   id: dark-mode-css
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AdapterSpec {
    /// Toggle a class on the root element while dark.
    Class { name: String },
    /// Set a root attribute to the theme name.
    Attribute { name: String },
    /// Enable a stylesheet while dark.
    Stylesheet { id: String },
}

impl AdapterSpec {
    pub fn build(&self) -> Box<dyn PresentationAdapter> {
        match self {
            AdapterSpec::Class { name } => Box::new(ClassAdapter::new(name)),
            AdapterSpec::Attribute { name } => Box::new(AttributeAdapter::new(name)),
            AdapterSpec::Stylesheet { id } => Box::new(StylesheetAdapter::new(id)),
        }
    }
}

/// Adapters used when configuration does not name any.
pub fn default_adapter_specs() -> Vec<AdapterSpec> {
    vec![
        AdapterSpec::Class {
            name: stock::DEFAULT_DARK_CLASS.to_string(),
        },
        AdapterSpec::Attribute {
            name: stock::DEFAULT_THEME_ATTRIBUTE.to_string(),
        },
        AdapterSpec::Stylesheet {
            id: stock::DEFAULT_DARK_STYLESHEET.to_string(),
        },
    ]
}
