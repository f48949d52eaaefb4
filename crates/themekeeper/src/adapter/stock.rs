//! Stock adapters: root class, root attribute, dark stylesheet.

use tracing::debug;

use super::{PresentationAdapter, PresentationError};
use crate::page::{Page, PageError};
use crate::theme::Theme;

pub(crate) const DEFAULT_DARK_CLASS: &str = "dark-mode";
pub(crate) const DEFAULT_THEME_ATTRIBUTE: &str = "data-theme";
pub(crate) const DEFAULT_DARK_STYLESHEET: &str = "dark-mode-css";

/// Adds a class to the root element while dark and removes it while light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAdapter {
    class: String,
}

impl ClassAdapter {
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
        }
    }
}

impl Default for ClassAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_DARK_CLASS)
    }
}

impl PresentationAdapter for ClassAdapter {
    fn apply(&self, page: &mut dyn Page, theme: Theme) -> Result<(), PresentationError> {
        page.set_root_class(&self.class, theme.is_dark())
            .map_err(|e| PresentationError::page("class", e))
    }

    fn applied(&self, page: &dyn Page) -> Option<Theme> {
        Some(if page.root_has_class(&self.class) {
            Theme::Dark
        } else {
            Theme::Light
        })
    }
}

/// Writes the theme name into a root attribute (`data-theme="dark"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAdapter {
    attribute: String,
}

impl AttributeAdapter {
    pub fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
        }
    }
}

impl Default for AttributeAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME_ATTRIBUTE)
    }
}

impl PresentationAdapter for AttributeAdapter {
    fn apply(&self, page: &mut dyn Page, theme: Theme) -> Result<(), PresentationError> {
        page.set_root_attribute(&self.attribute, theme.as_str())
            .map_err(|e| PresentationError::page("attribute", e))
    }

    fn applied(&self, page: &dyn Page) -> Option<Theme> {
        page.root_attribute(&self.attribute)?.parse().ok()
    }
}

/// Enables a dedicated dark stylesheet while dark.
///
/// Pages without the stylesheet are left alone: the stylesheet is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetAdapter {
    id: String,
}

impl StylesheetAdapter {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl Default for StylesheetAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_DARK_STYLESHEET)
    }
}

impl PresentationAdapter for StylesheetAdapter {
    fn apply(&self, page: &mut dyn Page, theme: Theme) -> Result<(), PresentationError> {
        match page.set_stylesheet_enabled(&self.id, theme.is_dark()) {
            Ok(()) => Ok(()),
            Err(PageError::MissingStylesheet(id)) => {
                debug!(stylesheet = %id, "optional dark stylesheet not present");
                Ok(())
            }
            Err(e) => Err(PresentationError::page("stylesheet", e)),
        }
    }

    fn applied(&self, page: &dyn Page) -> Option<Theme> {
        page.stylesheet_enabled(&self.id)
            .map(|enabled| if enabled { Theme::Dark } else { Theme::Light })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::VirtualPage;

    fn page() -> VirtualPage {
        VirtualPage::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_class_adapter_toggles_root_class() {
        let mut page = page();
        let adapter = ClassAdapter::default();

        adapter.apply(&mut page, Theme::Dark).unwrap();
        assert!(page.root_has_class("dark-mode"));
        assert_eq!(adapter.applied(&page), Some(Theme::Dark));

        adapter.apply(&mut page, Theme::Light).unwrap();
        assert!(!page.root_has_class("dark-mode"));
        assert_eq!(adapter.applied(&page), Some(Theme::Light));
    }

    #[test]
    fn test_class_adapter_is_idempotent() {
        let mut once = page();
        let mut twice = page();
        let adapter = ClassAdapter::new("night");

        adapter.apply(&mut once, Theme::Dark).unwrap();
        adapter.apply(&mut twice, Theme::Dark).unwrap();
        adapter.apply(&mut twice, Theme::Dark).unwrap();
        assert_eq!(once.render_html().unwrap(), twice.render_html().unwrap());
    }

    #[test]
    fn test_attribute_adapter_round_trip() {
        let mut page = page();
        let adapter = AttributeAdapter::default();
        assert_eq!(adapter.applied(&page), None);

        adapter.apply(&mut page, Theme::Dark).unwrap();
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
        assert_eq!(adapter.applied(&page), Some(Theme::Dark));
    }

    #[test]
    fn test_attribute_adapter_ignores_foreign_values() {
        let page = page().with_root_attribute("data-theme", "sepia");
        assert_eq!(AttributeAdapter::default().applied(&page), None);
    }

    #[test]
    fn test_stylesheet_adapter_enables_sheet() {
        let mut page = page().with_stylesheet("dark-mode-css", "/dark.css", false);
        let adapter = StylesheetAdapter::default();

        adapter.apply(&mut page, Theme::Dark).unwrap();
        assert_eq!(page.stylesheet_enabled("dark-mode-css"), Some(true));
        assert_eq!(adapter.applied(&page), Some(Theme::Dark));
    }

    #[test]
    fn test_stylesheet_adapter_tolerates_missing_sheet() {
        let mut page = page();
        let adapter = StylesheetAdapter::default();
        assert!(adapter.apply(&mut page, Theme::Dark).is_ok());
        assert_eq!(adapter.applied(&page), None);
    }

    #[test]
    fn test_rejected_mutation_is_reported() {
        let mut page = page().with_stylesheet("dark-mode-css", "/dark.css", false);
        page.set_frozen(true);
        let err = StylesheetAdapter::default()
            .apply(&mut page, Theme::Dark)
            .unwrap_err();
        assert!(matches!(
            err,
            PresentationError::Page {
                adapter: "stylesheet",
                ..
            }
        ));
    }
}
