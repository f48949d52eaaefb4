//! Controller configuration.
//!
//! [`ControllerConfig`] is plain data with a `Default` matching the stock
//! behavior, `with_*` builder methods, and a YAML form:
//!
//! ```yaml
//! storage_key: theme
//! legacy_key: site_dark_mode
//! fallback: light            # or: system
//! reload:
//!   mode: loopback           # or: never
//!   delay_ms: 300
//! selectors: ["#theme-toggle", "[data-theme-toggle]"]
//! synthesize_control: true
//! containers: [".header", "header"]
//! presentation:
//!   - kind: class
//!     name: dark-mode
//! event_name: themeChanged
//! ```
//!
//! Omitted fields keep their defaults; unknown fields are rejected.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapter::{default_adapter_specs, AdapterSpec};
use crate::page::{default_containers, default_selectors, ControlSelector};

/// Storage key of the persisted preference.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Storage key of the pre-`theme` boolean flag (`'1'`/`'0'`).
pub const LEGACY_STORAGE_KEY: &str = "site_dark_mode";

/// Name of the custom event dispatched after every toggle.
pub const DEFAULT_EVENT_NAME: &str = "themeChanged";

const DEFAULT_RELOAD_DELAY_MS: u64 = 300;

/// What to apply when no preference has ever been stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Always start light.
    #[default]
    Light,
    /// Ask the environment's color scheme once; the answer is persisted.
    System,
}

/// Whether a toggle also reloads the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReloadPolicy {
    #[default]
    Never,
    /// Reload after `delay_ms`, only when the page is served from a loopback host.
    Loopback {
        #[serde(default = "default_reload_delay_ms")]
        delay_ms: u64,
    },
}

fn default_reload_delay_ms() -> u64 {
    DEFAULT_RELOAD_DELAY_MS
}

impl ReloadPolicy {
    /// Loopback reloads with the default 300ms delay.
    pub fn loopback() -> Self {
        ReloadPolicy::Loopback {
            delay_ms: DEFAULT_RELOAD_DELAY_MS,
        }
    }

    /// The reload delay for loopback pages, if reloads are enabled.
    pub fn loopback_delay(self) -> Option<Duration> {
        match self {
            ReloadPolicy::Never => None,
            ReloadPolicy::Loopback { delay_ms } => Some(Duration::from_millis(delay_ms)),
        }
    }
}

/// Error returned when configuration cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for a [`ThemeController`](crate::ThemeController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    pub storage_key: String,
    /// Legacy flag to migrate from; `None` skips migration.
    pub legacy_key: Option<String>,
    pub fallback: FallbackPolicy,
    pub reload: ReloadPolicy,
    /// Tried in order to discover an existing toggle control.
    pub selectors: Vec<ControlSelector>,
    /// Insert a default control when no selector matches.
    pub synthesize_control: bool,
    /// Tried in order for an element to append a synthesized control to; with
    /// no match the control floats over the body.
    pub containers: Vec<ControlSelector>,
    pub presentation: Vec<AdapterSpec>,
    pub event_name: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            legacy_key: Some(LEGACY_STORAGE_KEY.to_string()),
            fallback: FallbackPolicy::default(),
            reload: ReloadPolicy::default(),
            selectors: default_selectors(),
            synthesize_control: true,
            containers: default_containers(),
            presentation: default_adapter_specs(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = if source.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(source)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.event_name.trim().is_empty() {
            return Err(ConfigError::Invalid("event_name must not be empty".into()));
        }
        if self.legacy_key.as_deref() == Some(self.storage_key.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "legacy_key must differ from storage_key '{}'",
                self.storage_key
            )));
        }
        Ok(())
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn with_legacy_key(mut self, key: Option<&str>) -> Self {
        self.legacy_key = key.map(str::to_string);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_reload(mut self, reload: ReloadPolicy) -> Self {
        self.reload = reload;
        self
    }

    pub fn with_selectors(mut self, selectors: Vec<ControlSelector>) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_synthesize_control(mut self, synthesize: bool) -> Self {
        self.synthesize_control = synthesize;
        self
    }

    pub fn with_containers(mut self, containers: Vec<ControlSelector>) -> Self {
        self.containers = containers;
        self
    }

    pub fn with_presentation(mut self, presentation: Vec<AdapterSpec>) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_event_name(mut self, name: &str) -> Self {
        self.event_name = name.to_string();
        self
    }
}
