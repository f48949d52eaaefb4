//! Theme model and ambient color-scheme detection.
//!
//! This module provides:
//!
//! - [`Theme`]: The two presentation modes, light and dark
//! - [`ThemeDetector`]: Function type used to query the ambient color scheme
//! - [`system_theme`]: Detector backed by the operating system setting
//!
//! A detector is only ever consulted once per origin, when no preference has
//! been stored yet and the controller is configured to follow the system.

mod detect;
mod preference;

pub use detect::{system_theme, DetectError, ThemeDetector};
pub use preference::{ParseThemeError, Theme};
