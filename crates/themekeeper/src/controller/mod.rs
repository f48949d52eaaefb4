//! The theme controller: resolve, apply, toggle.
//!
//! A [`ThemeController`] is created once per page and owns everything the
//! theme needs across the page's lifetime: the preference store, the
//! presentation adapter, the bound toggle control and any in-process
//! listeners. Callers hand it the page by reference for each operation.
//!
//! # Lifecycle
//!
//! 1. [`attach`](ThemeController::attach) runs [`initialize`](ThemeController::initialize)
//!    now if the page is parsed, or waits for `DomContentLoaded`.
//! 2. `initialize` resolves the preference (stored value, else the fallback,
//!    which is then stored), applies it, and finds or inserts the toggle control.
//! 3. Each click on the control runs [`toggle`](ThemeController::toggle).
//!
//! No operation returns an error. Storage, page and detection failures are
//! logged and the controller carries on; the worst outcome is a light page.

mod event;

use tracing::{debug, info, warn};

use crate::adapter::{CompositeAdapter, PresentationAdapter};
use crate::config::{ControllerConfig, FallbackPolicy};
use crate::page::{ControlHandle, ControlState, Page, PageEvent, ReadyState, ToggleControl};
use crate::store::{migrate_legacy, PreferenceStore};
use crate::theme::{system_theme, Theme, ThemeDetector};

pub use event::{ThemeChanged, ToggleOutcome};

type Listener = Box<dyn FnMut(&ThemeChanged)>;

/// Resolves, applies and toggles the page theme.
///
/// # Example
///
/// ```rust
/// use themekeeper::{MemoryStore, Page, PreferenceStore, Theme, ThemeController, VirtualPage};
///
/// let mut page = VirtualPage::parse("https://example.com/").unwrap();
/// let mut controller = ThemeController::new(MemoryStore::new());
///
/// assert_eq!(controller.attach(&mut page), Some(Theme::Light));
/// assert_eq!(controller.store().get("theme").unwrap().as_deref(), Some("light"));
///
/// let control = controller.control().unwrap();
/// page.click(control);
/// let outcomes = controller.run_pending(&mut page);
///
/// assert_eq!(outcomes[0].theme, Theme::Dark);
/// assert!(page.root_has_class("dark-mode"));
/// assert_eq!(controller.store().get("theme").unwrap().as_deref(), Some("dark"));
/// ```
pub struct ThemeController<S: PreferenceStore> {
    config: ControllerConfig,
    store: S,
    adapter: Box<dyn PresentationAdapter>,
    detector: ThemeDetector,
    control: Option<ControlHandle>,
    theme: Option<Theme>,
    initialized: bool,
    listeners: Vec<Listener>,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Creates a controller with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ControllerConfig::default())
    }

    /// Creates a controller whose adapters come from `config.presentation`.
    pub fn with_config(store: S, config: ControllerConfig) -> Self {
        let adapter = Box::new(CompositeAdapter::from_specs(&config.presentation));
        Self {
            config,
            store,
            adapter,
            detector: system_theme,
            control: None,
            theme: None,
            initialized: false,
            listeners: Vec::new(),
        }
    }

    /// Replaces the presentation adapter built from configuration.
    pub fn with_adapter<A: PresentationAdapter + 'static>(mut self, adapter: A) -> Self {
        self.adapter = Box::new(adapter);
        self
    }

    /// Replaces the color-scheme detector used by [`FallbackPolicy::System`].
    pub fn with_detector(mut self, detector: ThemeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The theme most recently applied by this controller.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// The toggle control bound during initialization.
    pub fn control(&self) -> Option<ControlHandle> {
        self.control
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registers a listener called with every `themeChanged` notification.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ThemeChanged) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Initializes now if the page is parsed, otherwise on `DomContentLoaded`.
    ///
    /// Returns the applied theme when initialization ran (or had already run).
    pub fn attach(&mut self, page: &mut dyn Page) -> Option<Theme> {
        if page.ready_state() == ReadyState::Loading && !self.initialized {
            debug!("page still loading, deferring theme initialization");
            return None;
        }
        Some(self.initialize(page))
    }

    /// Resolves the preference, applies it and binds the toggle control.
    ///
    /// Only the first call does any work; later calls return the theme
    /// currently applied by this controller.
    pub fn initialize(&mut self, page: &mut dyn Page) -> Theme {
        if self.initialized {
            let theme = self.theme.unwrap_or_default();
            debug!(%theme, "theme controller already initialized");
            return theme;
        }
        self.initialized = true;

        let theme = self.resolve();
        self.apply(page, theme);
        self.theme = Some(theme);
        self.bind_control(page, theme);
        info!(%theme, origin = %page.location().origin(), "theme initialized");
        theme
    }

    /// Flips the theme shown by the page.
    ///
    /// The previous theme is read from the page itself, so changes made by
    /// other scripts are respected. Performs exactly one store write and one
    /// adapter apply.
    pub fn toggle(&mut self, page: &mut dyn Page) -> ToggleOutcome {
        let previous = self
            .adapter
            .applied(&*page)
            .or(self.theme)
            .unwrap_or_default();
        let theme = previous.toggled();

        let persisted = match self.store.set(&self.config.storage_key, theme.as_str()) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, %theme, "failed to persist theme preference");
                false
            }
        };
        self.apply(page, theme);
        self.theme = Some(theme);
        self.render_control(page, theme);
        self.notify(page, ThemeChanged { theme });
        let reload_scheduled = self.schedule_reload(page);

        info!(%previous, %theme, persisted, "theme toggled");
        ToggleOutcome {
            previous,
            theme,
            persisted,
            reload_scheduled,
        }
    }

    /// Reacts to one page event.
    pub fn handle_event(&mut self, page: &mut dyn Page, event: PageEvent) -> Option<ToggleOutcome> {
        match event {
            PageEvent::DomContentLoaded => {
                self.initialize(page);
                None
            }
            PageEvent::Click(handle) if self.control == Some(handle) => Some(self.toggle(page)),
            PageEvent::Click(handle) => {
                debug!(%handle, "ignoring click outside the theme toggle");
                None
            }
        }
    }

    /// Drains the page event queue, returning the outcome of each toggle.
    pub fn run_pending(&mut self, page: &mut dyn Page) -> Vec<ToggleOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = page.next_event() {
            if let Some(outcome) = self.handle_event(page, event) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    fn resolve(&mut self) -> Theme {
        let key = self.config.storage_key.as_str();

        if let Some(legacy_key) = self.config.legacy_key.as_deref() {
            match migrate_legacy(&mut self.store, key, legacy_key) {
                Ok(Some(theme)) => return theme,
                Ok(None) => {}
                Err(e) => warn!(error = %e, legacy_key, "legacy theme migration failed"),
            }
        }

        match self.store.get(key) {
            Ok(Some(raw)) => match raw.parse::<Theme>() {
                Ok(theme) => {
                    debug!(%theme, "using stored theme preference");
                    return theme;
                }
                Err(e) => warn!(error = %e, "ignoring unrecognized stored theme"),
            },
            Ok(None) => debug!("no stored theme preference"),
            Err(e) => {
                warn!(error = %e, "preference storage unavailable, using light theme");
                return Theme::Light;
            }
        }

        let theme = self.fallback();
        if let Err(e) = self.store.set(key, theme.as_str()) {
            warn!(error = %e, %theme, "failed to persist default theme");
        }
        theme
    }

    fn fallback(&self) -> Theme {
        match self.config.fallback {
            FallbackPolicy::Light => Theme::Light,
            FallbackPolicy::System => match (self.detector)() {
                Ok(theme) => {
                    debug!(%theme, "using system color scheme as initial theme");
                    theme
                }
                Err(e) => {
                    warn!(error = %e, "system color scheme unavailable, using light theme");
                    Theme::Light
                }
            },
        }
    }

    fn apply(&self, page: &mut dyn Page, theme: Theme) {
        if let Err(e) = self.adapter.apply(page, theme) {
            warn!(error = %e, %theme, "failed to apply theme");
        }
    }

    fn bind_control(&mut self, page: &mut dyn Page, theme: Theme) {
        let found = self
            .config
            .selectors
            .iter()
            .find_map(|selector| page.find_control(selector).map(|handle| (selector, handle)));

        let handle = match found {
            Some((selector, handle)) => {
                debug!(%selector, %handle, "found existing theme toggle");
                handle
            }
            None if self.config.synthesize_control => {
                let container = self
                    .config
                    .containers
                    .iter()
                    .find_map(|selector| page.find_control(selector));
                let control = match container {
                    Some(_) => ToggleControl::docked(theme),
                    None => ToggleControl::synthesized(theme),
                };
                match page.insert_control(&control, container) {
                    Ok(handle) => {
                        debug!(%handle, docked = container.is_some(), "inserted default theme toggle");
                        handle
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to insert theme toggle");
                        return;
                    }
                }
            }
            None => {
                debug!("no theme toggle on page and synthesis disabled");
                return;
            }
        };

        if let Err(e) = page.bind_click(handle) {
            warn!(error = %e, %handle, "failed to bind theme toggle");
        }
        self.control = Some(handle);
        self.render_control(page, theme);
    }

    fn render_control(&self, page: &mut dyn Page, theme: Theme) {
        let Some(handle) = self.control else {
            return;
        };
        if let Err(e) = page.render_control(handle, &ControlState::for_theme(theme)) {
            warn!(error = %e, %handle, "failed to update theme toggle");
        }
    }

    fn notify(&mut self, page: &mut dyn Page, event: ThemeChanged) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        match serde_json::to_value(event) {
            Ok(detail) => {
                if let Err(e) = page.dispatch_event(&self.config.event_name, &detail) {
                    warn!(error = %e, "failed to dispatch theme change event");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode theme change event"),
        }
    }

    fn schedule_reload(&self, page: &mut dyn Page) -> bool {
        let Some(delay) = self.config.reload.loopback_delay() else {
            return false;
        };
        if !page.location().is_loopback() {
            return false;
        }
        match page.schedule_reload(delay) {
            Ok(()) => {
                debug!(delay_ms = delay.as_millis() as u64, "page reload scheduled");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to schedule page reload");
                false
            }
        }
    }
}

impl<S: PreferenceStore + std::fmt::Debug> std::fmt::Debug for ThemeController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("control", &self.control)
            .field("theme", &self.theme)
            .field("initialized", &self.initialized)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
