//! In-memory page implementation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use serde::Serialize;

use super::render;
use super::{
    ControlHandle, ControlSelector, ControlState, Page, PageError, PageEvent, PageLocation,
    ReadyState, ToggleControl,
};

/// An element in a [`VirtualPage`] body.
///
/// # Example
///
/// ```rust
/// use themekeeper::Element;
///
/// let button = Element::new("button")
///     .with_id("dark-mode-toggle")
///     .with_class("btn")
///     .with_attribute("data-theme-toggle", "");
/// assert_eq!(button.id(), Some("dark-mode-toggle"));
/// assert!(button.has_class("btn"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    #[serde(skip)]
    parent: Option<usize>,
    #[serde(skip)]
    click_bound: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
            click_bound: false,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The element this one was appended to, if not the body.
    pub fn parent(&self) -> Option<ControlHandle> {
        self.parent.map(ControlHandle::from_index)
    }

    /// Whether clicks on this element reach the page event queue.
    pub fn is_click_bound(&self) -> bool {
        self.click_bound
    }

    fn matches(&self, selector: &ControlSelector) -> bool {
        match selector {
            ControlSelector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
            ControlSelector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            ControlSelector::Class(class) => self.classes.contains(class),
            ControlSelector::Attribute { name, value: None } => self.attributes.contains_key(name),
            ControlSelector::Attribute {
                name,
                value: Some(value),
            } => self.attributes.get(name) == Some(value),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct Root {
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
struct Stylesheet {
    id: String,
    href: String,
    enabled: bool,
}

/// A custom event dispatched on a [`VirtualPage`].
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedEvent {
    pub name: String,
    pub detail: serde_json::Value,
}

#[derive(Serialize)]
struct Node<'a> {
    #[serde(flatten)]
    element: &'a Element,
    children: Vec<Node<'a>>,
}

fn children_of(elements: &[Element], parent: Option<usize>) -> Vec<Node<'_>> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, el)| el.parent == parent)
        .map(|(i, element)| Node {
            element,
            children: children_of(elements, Some(i)),
        })
        .collect()
}

#[derive(Serialize)]
struct Snapshot<'a> {
    root: &'a Root,
    stylesheets: &'a [Stylesheet],
    elements: Vec<Node<'a>>,
}

/// A page held entirely in memory.
///
/// Records everything the controller does to it (classes, attributes,
/// stylesheet state, controls, dispatched events, scheduled reloads) and
/// lets callers simulate loading and clicks.
///
/// # Example
///
/// ```rust
/// use themekeeper::{Page, PageLocation, ReadyState, VirtualPage};
///
/// let location = PageLocation::parse("https://example.com/").unwrap();
/// let mut page = VirtualPage::loading(location)
///     .with_stylesheet("dark-mode-css", "/css/dark.css", false);
/// assert_eq!(page.ready_state(), ReadyState::Loading);
///
/// page.finish_loading();
/// assert_eq!(page.ready_state(), ReadyState::Interactive);
/// assert_eq!(page.stylesheet_enabled("dark-mode-css"), Some(false));
/// ```
#[derive(Debug, Clone)]
pub struct VirtualPage {
    location: PageLocation,
    ready_state: ReadyState,
    root: Root,
    stylesheets: Vec<Stylesheet>,
    elements: Vec<Element>,
    events: VecDeque<PageEvent>,
    dispatched: Vec<DispatchedEvent>,
    reloads: Vec<Duration>,
    frozen: bool,
}

impl VirtualPage {
    /// Creates a fully loaded page.
    pub fn new(location: PageLocation) -> Self {
        Self {
            location,
            ready_state: ReadyState::Complete,
            root: Root::default(),
            stylesheets: Vec::new(),
            elements: Vec::new(),
            events: VecDeque::new(),
            dispatched: Vec::new(),
            reloads: Vec::new(),
            frozen: false,
        }
    }

    /// Creates a page that is still parsing; see [`finish_loading`](Self::finish_loading).
    pub fn loading(location: PageLocation) -> Self {
        Self {
            ready_state: ReadyState::Loading,
            ..Self::new(location)
        }
    }

    /// Parses `url` and creates a fully loaded page for it.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        PageLocation::parse(url).map(Self::new)
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_stylesheet(mut self, id: &str, href: &str, enabled: bool) -> Self {
        self.stylesheets.push(Stylesheet {
            id: id.to_string(),
            href: href.to_string(),
            enabled,
        });
        self
    }

    pub fn with_root_class(mut self, class: &str) -> Self {
        self.root.classes.insert(class.to_string());
        self
    }

    pub fn with_root_attribute(mut self, name: &str, value: &str) -> Self {
        self.root.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Makes every later mutation fail with [`PageError::Rejected`].
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Ends parsing and queues [`PageEvent::DomContentLoaded`].
    ///
    /// Has no effect once the page is past [`ReadyState::Loading`].
    pub fn finish_loading(&mut self) {
        if self.ready_state == ReadyState::Loading {
            self.ready_state = ReadyState::Interactive;
            self.events.push_back(PageEvent::DomContentLoaded);
        }
    }

    /// Simulates a user click. Returns false if the element has no bound listener.
    pub fn click(&mut self, handle: ControlHandle) -> bool {
        match self.elements.get(handle.index()) {
            Some(el) if el.click_bound => {
                self.events.push_back(PageEvent::Click(handle));
                true
            }
            _ => false,
        }
    }

    pub fn element(&self, handle: ControlHandle) -> Option<&Element> {
        self.elements.get(handle.index())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Handles of every element whose clicks are bound.
    pub fn bound_controls(&self) -> Vec<ControlHandle> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.click_bound)
            .map(|(i, _)| ControlHandle::from_index(i))
            .collect()
    }

    pub fn dispatched_events(&self) -> &[DispatchedEvent] {
        &self.dispatched
    }

    pub fn scheduled_reloads(&self) -> &[Duration] {
        &self.reloads
    }

    /// Renders the current document as HTML.
    pub fn render_html(&self) -> Result<String, PageError> {
        render::page_markup(&Snapshot {
            root: &self.root,
            stylesheets: &self.stylesheets,
            elements: children_of(&self.elements, None),
        })
    }

    fn check_writable(&self) -> Result<(), PageError> {
        if self.frozen {
            Err(PageError::Rejected("document is frozen".to_string()))
        } else {
            Ok(())
        }
    }

    fn element_mut(&mut self, handle: ControlHandle) -> Result<&mut Element, PageError> {
        self.elements
            .get_mut(handle.index())
            .ok_or(PageError::UnknownControl(handle))
    }
}

impl Page for VirtualPage {
    fn location(&self) -> &PageLocation {
        &self.location
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn root_has_class(&self, class: &str) -> bool {
        self.root.classes.contains(class)
    }

    fn set_root_class(&mut self, class: &str, present: bool) -> Result<(), PageError> {
        self.check_writable()?;
        if present {
            self.root.classes.insert(class.to_string());
        } else {
            self.root.classes.remove(class);
        }
        Ok(())
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root.attributes.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), PageError> {
        self.check_writable()?;
        self.root
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn stylesheet_enabled(&self, id: &str) -> Option<bool> {
        self.stylesheets
            .iter()
            .find(|sheet| sheet.id == id)
            .map(|sheet| sheet.enabled)
    }

    fn set_stylesheet_enabled(&mut self, id: &str, enabled: bool) -> Result<(), PageError> {
        self.check_writable()?;
        let sheet = self
            .stylesheets
            .iter_mut()
            .find(|sheet| sheet.id == id)
            .ok_or_else(|| PageError::MissingStylesheet(id.to_string()))?;
        sheet.enabled = enabled;
        Ok(())
    }

    fn find_control(&self, selector: &ControlSelector) -> Option<ControlHandle> {
        self.elements
            .iter()
            .position(|el| el.matches(selector))
            .map(ControlHandle::from_index)
    }

    fn insert_control(
        &mut self,
        control: &ToggleControl,
        container: Option<ControlHandle>,
    ) -> Result<ControlHandle, PageError> {
        self.check_writable()?;
        if let Some(container) = container {
            self.element_mut(container)?;
        }
        let mut element = Element::new("button")
            .with_id(&control.id)
            .with_class(&control.class)
            .with_attribute("type", "button");
        if control.is_floating() {
            element = element.with_attribute("style", &control.style);
        }
        element.parent = container.map(ControlHandle::index);
        self.elements.push(element);
        let handle = ControlHandle::from_index(self.elements.len() - 1);
        self.render_control(handle, &control.state)?;
        Ok(handle)
    }

    fn bind_click(&mut self, handle: ControlHandle) -> Result<(), PageError> {
        self.check_writable()?;
        self.element_mut(handle)?.click_bound = true;
        Ok(())
    }

    fn render_control(&mut self, handle: ControlHandle, state: &ControlState) -> Result<(), PageError> {
        self.check_writable()?;
        let el = self.element_mut(handle)?;
        el.text = state.glyph.clone();
        el.attributes
            .insert("aria-label".to_string(), state.label.clone());
        el.attributes.insert("title".to_string(), state.title.clone());
        el.attributes
            .insert("aria-pressed".to_string(), state.pressed.to_string());
        Ok(())
    }

    fn dispatch_event(&mut self, name: &str, detail: &serde_json::Value) -> Result<(), PageError> {
        self.check_writable()?;
        self.dispatched.push(DispatchedEvent {
            name: name.to_string(),
            detail: detail.clone(),
        });
        Ok(())
    }

    fn schedule_reload(&mut self, delay: Duration) -> Result<(), PageError> {
        self.check_writable()?;
        self.reloads.push(delay);
        Ok(())
    }

    fn next_event(&mut self) -> Option<PageEvent> {
        self.events.pop_front()
    }
}
