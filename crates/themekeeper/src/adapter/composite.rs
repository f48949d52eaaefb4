//! Several adapters applied as one.

use tracing::warn;

use super::{default_adapter_specs, AdapterSpec, PresentationAdapter, PresentationError};
use crate::page::Page;
use crate::theme::Theme;

/// Applies every member adapter in order.
///
/// A failing member does not stop the others; the first failure is reported
/// once all have run. [`applied`](PresentationAdapter::applied) reports dark
/// when any member sees dark, otherwise the first member's answer, so a page
/// darkened through a single mechanism still reads as dark.
///
/// # Example
///
/// ```rust
/// use themekeeper::{CompositeAdapter, Page, PresentationAdapter, Theme, VirtualPage};
///
/// let mut page = VirtualPage::parse("https://example.com/").unwrap();
/// let adapter = CompositeAdapter::default();
/// adapter.apply(&mut page, Theme::Dark).unwrap();
///
/// assert!(page.root_has_class("dark-mode"));
/// assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
/// ```
pub struct CompositeAdapter {
    members: Vec<Box<dyn PresentationAdapter>>,
}

impl CompositeAdapter {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn from_specs(specs: &[AdapterSpec]) -> Self {
        Self {
            members: specs.iter().map(AdapterSpec::build).collect(),
        }
    }

    /// Adds a member adapter, returning the composite for chaining.
    pub fn with<A: PresentationAdapter + 'static>(mut self, adapter: A) -> Self {
        self.members.push(Box::new(adapter));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The stock class, attribute and stylesheet adapters.
impl Default for CompositeAdapter {
    fn default() -> Self {
        Self::from_specs(&default_adapter_specs())
    }
}

impl std::fmt::Debug for CompositeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeAdapter")
            .field("members", &self.members.len())
            .finish()
    }
}

impl PresentationAdapter for CompositeAdapter {
    fn apply(&self, page: &mut dyn Page, theme: Theme) -> Result<(), PresentationError> {
        let mut failures = Vec::new();
        for member in &self.members {
            if let Err(e) = member.apply(page, theme) {
                warn!(error = %e, %theme, "presentation adapter failed");
                failures.push(e);
            }
        }
        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(PresentationError::Partial {
                failed,
                total: self.members.len(),
                first: Box::new(first),
            }),
        }
    }

    fn applied(&self, page: &dyn Page) -> Option<Theme> {
        let mut first = None;
        for theme in self.members.iter().filter_map(|member| member.applied(page)) {
            if theme.is_dark() {
                return Some(theme);
            }
            first.get_or_insert(theme);
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AttributeAdapter, ClassAdapter, StylesheetAdapter};
    use crate::page::VirtualPage;

    #[test]
    fn test_empty_composite_applies_nothing() {
        let mut page = VirtualPage::parse("https://example.com/").unwrap();
        let adapter = CompositeAdapter::new();
        assert!(adapter.is_empty());
        assert!(adapter.apply(&mut page, Theme::Dark).is_ok());
        assert_eq!(adapter.applied(&page), None);
    }

    #[test]
    fn test_stock_composite_applies_all_members() {
        let mut page = VirtualPage::parse("https://example.com/")
            .unwrap()
            .with_stylesheet("dark-mode-css", "/dark.css", false);
        let adapter = CompositeAdapter::default();
        assert_eq!(adapter.len(), 3);

        adapter.apply(&mut page, Theme::Dark).unwrap();
        assert!(page.root_has_class("dark-mode"));
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
        assert_eq!(page.stylesheet_enabled("dark-mode-css"), Some(true));
    }

    #[test]
    fn test_applied_skips_members_without_answer() {
        let page = VirtualPage::parse("https://example.com/")
            .unwrap()
            .with_root_attribute("data-theme", "dark");
        let adapter = CompositeAdapter::new()
            .with(StylesheetAdapter::default())
            .with(AttributeAdapter::default())
            .with(ClassAdapter::default());
        assert_eq!(adapter.applied(&page), Some(Theme::Dark));
    }

    #[test]
    fn test_applied_sees_dark_attribute_behind_light_class() {
        let page = VirtualPage::parse("https://example.com/")
            .unwrap()
            .with_root_attribute("data-theme", "dark");
        let adapter = CompositeAdapter::default();
        assert_eq!(ClassAdapter::default().applied(&page), Some(Theme::Light));
        assert_eq!(adapter.applied(&page), Some(Theme::Dark));
    }

    #[test]
    fn test_applied_light_when_no_member_sees_dark() {
        let page = VirtualPage::parse("https://example.com/")
            .unwrap()
            .with_root_attribute("data-theme", "light")
            .with_stylesheet("dark-mode-css", "/dark.css", false);
        assert_eq!(CompositeAdapter::default().applied(&page), Some(Theme::Light));
    }

    #[test]
    fn test_failures_are_collected() {
        let mut page = VirtualPage::parse("https://example.com/").unwrap();
        page.set_frozen(true);
        let err = CompositeAdapter::default()
            .apply(&mut page, Theme::Dark)
            .unwrap_err();
        match err {
            PresentationError::Partial { failed, total, .. } => {
                assert_eq!(failed, 3);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
