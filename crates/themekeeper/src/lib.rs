//! # Themekeeper - Persisted Light/Dark Theme Control
//!
//! `themekeeper` keeps a page's light/dark presentation in step with the
//! user's saved choice. It reads the preference from origin-scoped storage,
//! applies it through a presentation adapter, finds or inserts a toggle
//! control, and flips the theme on every click.
//!
//! ## Core Concepts
//!
//! - [`Theme`]: `light` or `dark`
//! - [`PreferenceStore`]: Where the choice lives ([`MemoryStore`], [`FileStore`])
//! - [`Page`]: The document surface the controller drives ([`VirtualPage`] in memory)
//! - [`PresentationAdapter`]: How a theme becomes visible (root class, root
//!   attribute, dark stylesheet, or a [`CompositeAdapter`] of these)
//! - [`ThemeController`]: One owned instance per page tying it all together
//!
//! ## Quick Start
//!
//! ```rust
//! use themekeeper::{MemoryStore, Page, Theme, ThemeController, VirtualPage};
//!
//! let store = MemoryStore::new().with_entry("theme", "dark");
//! let mut page = VirtualPage::parse("https://example.com/").unwrap();
//! let mut controller = ThemeController::new(store);
//!
//! assert_eq!(controller.initialize(&mut page), Theme::Dark);
//! assert!(page.root_has_class("dark-mode"));
//!
//! let outcome = controller.toggle(&mut page);
//! assert_eq!(outcome.theme, Theme::Light);
//! assert!(!page.root_has_class("dark-mode"));
//! ```
//!
//! ## Resolution Rules
//!
//! - A stored `theme` value always wins.
//! - A legacy `site_dark_mode` flag (`'1'`/`'0'`) is migrated into `theme` once.
//! - With nothing stored, [`FallbackPolicy`] picks the first theme (light by
//!   default, or the system color scheme) and that choice is stored.
//! - When storage itself fails the page is shown light and nothing is stored.
//!
//! Failures never escape the controller; they are reported through `tracing`.

pub mod adapter;
pub mod config;
pub mod controller;
pub mod page;
pub mod store;
pub mod theme;

pub use adapter::{
    AdapterSpec, AttributeAdapter, ClassAdapter, CompositeAdapter, PresentationAdapter,
    PresentationError, StylesheetAdapter,
};
pub use config::{
    ConfigError, ControllerConfig, FallbackPolicy, ReloadPolicy, DEFAULT_EVENT_NAME,
    DEFAULT_STORAGE_KEY, LEGACY_STORAGE_KEY,
};
pub use controller::{ThemeChanged, ThemeController, ToggleOutcome};
pub use page::{
    ControlHandle, ControlSelector, ControlState, DispatchedEvent, Element, Page, PageError,
    PageEvent, PageLocation, ReadyState, ToggleControl, VirtualPage,
};
pub use store::{migrate_legacy, Access, FileStore, MemoryStore, PreferenceStore, StoreError};
pub use theme::{system_theme, DetectError, ParseThemeError, Theme, ThemeDetector};
