//! The host page the controller drives.
//!
//! This module provides:
//!
//! - [`Page`]: The document/browser surface (classes, attributes, stylesheets,
//!   controls, events, reloads)
//! - [`PageLocation`]: The page URL, its storage origin and loopback check
//! - [`ControlSelector`], [`ControlHandle`], [`ControlState`], [`ToggleControl`]:
//!   Discovery and rendering of the toggle control
//! - [`VirtualPage`]: An in-memory page for tests and command-line use
//!
//! A browser binding implements [`Page`] over the real DOM; nothing in the
//! controller depends on how.

mod control;
mod error;
mod location;
mod render;
mod virtual_page;

use std::time::Duration;

pub use control::{
    default_containers, default_selectors, ControlHandle, ControlSelector, ControlState,
    ParseSelectorError, ToggleControl, DEFAULT_CONTROL_ID,
};
pub use error::PageError;
pub use location::PageLocation;
pub use virtual_page::{DispatchedEvent, Element, VirtualPage};

/// Loading phase of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// The document is still being parsed.
    Loading,
    /// The document is parsed; subresources may still be loading.
    Interactive,
    Complete,
}

/// Events a page delivers to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document finished parsing.
    DomContentLoaded,
    /// An element with a bound click listener was activated.
    Click(ControlHandle),
}

/// The document surface a [`ThemeController`](crate::ThemeController) works against.
///
/// Methods map onto the handful of DOM operations a theme toggle needs. All
/// mutations are fallible so that bindings can report script errors; the
/// controller logs such failures and carries on.
pub trait Page {
    fn location(&self) -> &PageLocation;

    fn ready_state(&self) -> ReadyState;

    /// Whether the root (`<html>`) element carries `class`.
    fn root_has_class(&self, class: &str) -> bool;

    /// Adds or removes a class on the root element.
    fn set_root_class(&mut self, class: &str, present: bool) -> Result<(), PageError>;

    fn root_attribute(&self, name: &str) -> Option<String>;

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), PageError>;

    /// Whether the stylesheet `id` is enabled, or `None` if the page has no such stylesheet.
    fn stylesheet_enabled(&self, id: &str) -> Option<bool>;

    /// Enables or disables a stylesheet.
    ///
    /// Returns [`PageError::MissingStylesheet`] when the page has no stylesheet `id`.
    fn set_stylesheet_enabled(&mut self, id: &str, enabled: bool) -> Result<(), PageError>;

    /// Finds the first element matching `selector`.
    fn find_control(&self, selector: &ControlSelector) -> Option<ControlHandle>;

    /// Inserts a synthesized control, appended to `container` when given and
    /// to the document body otherwise.
    fn insert_control(
        &mut self,
        control: &ToggleControl,
        container: Option<ControlHandle>,
    ) -> Result<ControlHandle, PageError>;

    /// Routes clicks on `handle` to the page event queue.
    fn bind_click(&mut self, handle: ControlHandle) -> Result<(), PageError>;

    /// Updates the icon, label, title and pressed state of a control.
    fn render_control(&mut self, handle: ControlHandle, state: &ControlState) -> Result<(), PageError>;

    /// Dispatches a custom event with a JSON detail payload.
    fn dispatch_event(&mut self, name: &str, detail: &serde_json::Value) -> Result<(), PageError>;

    /// Schedules a full page reload after `delay`.
    fn schedule_reload(&mut self, delay: Duration) -> Result<(), PageError>;

    /// Takes the next pending event, if any.
    fn next_event(&mut self) -> Option<PageEvent>;
}
