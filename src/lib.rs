//! Gardenia: a Zellij plugin for editing an irrigation controller's records.
//!
//! Gardenia opens modal forms for plants, zones, locations and schedules on
//! top of each other and injects pickers (time, duration, location) above
//! the form that asked for them. It provides:
//! - A layer stack deciding which form or picker is on top, its depth and
//!   z-index
//! - Outside-click dismissal that only ever closes the top layer
//! - Nested forms (a new location created from inside a plant or zone form)
//! - REST persistence through Zellij's `web_request`

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling routed by top layer               │
//! │  - Forms, nested forms and pickers                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Layer Stack   │   │ API Layer     │
//! │ (ui/)         │   │ (layers/)     │   │ (api/)        │
//! │ - Rendering   │   │ - Registry    │   │ - Requests    │
//! │ - Theming     │   │ - Bindings    │   │ - Responses   │
//! │ - Components  │   │ - Click gate  │   │ - Trace ctx   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Pickers & Infrastructure                   │
//! │  - Error types and resources (domain/)              │
//! │  - Time, duration and location pickers (pickers/)   │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - Rotating OTLP JSON file export                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`layers`]: Layer registry, provider, bindings and outside-click gate
//! - [`app`]: Application state machine with event/action model
//! - [`api`]: REST requests and decoded responses
//! - [`domain`]: Core domain types (resources, errors)
//! - [`pickers`]: Pickers injected above forms
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`ui`]: Terminal rendering with theme support
//! - `observability`: OpenTelemetry tracing (internal)
//!
//! # Configuration
//!
//! The plugin is configured via Zellij's plugin configuration:
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/gardenia.wasm" {
//!         api_url "http://controller.local:8000/api"
//!         base_z_index "1000"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`):
//!    - Parse configuration from Zellij
//!    - Initialize tracing (optional)
//!    - Create `AppState` with theme and base z-index
//!    - Request web access and subscribe to Zellij events
//!
//! 2. **Permission Granted**:
//!    - Fetch the location list used by the location picker
//!
//! 3. **Editing**:
//!    - Shortcuts open forms; each form registers a layer on open
//!    - Pickers are injected above their form and unregister on close
//!    - Submits become `POST` requests; responses close or annotate forms
//!
//! 4. **UI Rendering**:
//!    - Compute view model from state
//!    - Render header, layers by z-index, footer
//!
//! # Examples
//!
//! ```rust
//! use gardenia::{handle_event, initialize, Config, Event, ResourceKind};
//!
//! let mut state = initialize(&Config::default());
//!
//! handle_event(&mut state, &Event::OpenForm(ResourceKind::Plant))?;
//! handle_event(&mut state, &Event::OpenForm(ResourceKind::Location))?;
//!
//! let view = state.compute_viewmodel();
//! assert_eq!(view.layers.len(), 2);
//! assert!(view.layers[1].z_index > view.layers[0].z_index);
//! # Ok::<(), gardenia::GardeniaError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod layers;
pub mod pickers;

pub mod ui;

pub mod observability;

pub use api::{ApiRequest, ApiResponse};
pub use app::{handle_event, Action, AppState, Event};
pub use domain::{GardeniaError, ResourceKind, Result};
pub use layers::{LayerId, LayerKind, LayerProvider, DEFAULT_BASE_Z, MAX_BASE_Z};
pub use ui::Theme;

use std::collections::BTreeMap;

/// REST endpoint used when the configuration names none.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/gardenia.wasm" {
///     api_url "http://controller.local:8000/api"
///     base_z_index "2000"
///     theme "catppuccin-latte"
///     theme_file "~/.config/gardenia/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the irrigation REST API, without a trailing resource.
    ///
    /// Default: [`DEFAULT_API_URL`]
    pub api_url: String,

    /// z-index of the bottom layer; each layer above adds one.
    ///
    /// Default: [`DEFAULT_BASE_Z`]
    pub base_z_index: u32,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file, `~` expanded.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_z_index: DEFAULT_BASE_Z,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// # Parsing Rules
    ///
    /// - `api_url`: trimmed; blank values fall back to [`DEFAULT_API_URL`]
    /// - `base_z_index`: String → `u32` (falls back to [`DEFAULT_BASE_Z`] on
    ///   parse error or above [`MAX_BASE_Z`])
    /// - `theme`: String → `Option<String>`
    /// - `theme_file`: String → `Option<String>` with `~` expanded
    /// - `trace_level`: String → `Option<String>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use gardenia::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "http://10.0.0.7/api".to_string());
    /// map.insert("base_z_index".to_string(), "50".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_url, "http://10.0.0.7/api");
    /// assert_eq!(config.base_z_index, 50);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let api_url = config
            .get("api_url")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let base_z_index = config.get("base_z_index").map_or(DEFAULT_BASE_Z, |raw| {
            raw.trim()
                .parse::<u32>()
                .ok()
                .filter(|base| *base <= MAX_BASE_Z)
                .unwrap_or_else(|| {
                    tracing::debug!(base_z_index = %raw, "invalid base_z_index, using default");
                    DEFAULT_BASE_Z
                })
        });

        Self {
            api_url,
            base_z_index,
            theme_name: config.get("theme").cloned(),
            theme_file: config
                .get("theme_file")
                .map(String::as_str)
                .map(infrastructure::expand_tilde),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Creates a new `AppState` with the theme named by the configuration (file,
/// then built-in name, then the default) and an empty layer stack based at
/// `base_z_index`. The location list stays empty until the API answers.
///
/// # Example
///
/// ```rust
/// use gardenia::{initialize, Config};
///
/// let config = Config {
///     base_z_index: 10,
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.provider().base_z(), 10);
/// assert!(state.provider().is_empty());
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(base_z = config.base_z_index, "initializing gardenia plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(theme, config.base_z_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_configuration_uses_defaults() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.base_z_index, DEFAULT_BASE_Z);
        assert!(config.theme_name.is_none());
        assert!(config.trace_level.is_none());
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_zellij(&map(&[("api_url", "   "), ("base_z_index", "-4")]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.base_z_index, DEFAULT_BASE_Z);
    }

    #[test]
    fn oversized_base_z_index_falls_back() {
        let config = Config::from_zellij(&map(&[("base_z_index", "4294967295")]));
        assert_eq!(config.base_z_index, DEFAULT_BASE_Z);

        let edge = MAX_BASE_Z.to_string();
        let config = Config::from_zellij(&map(&[("base_z_index", edge.as_str())]));
        assert_eq!(config.base_z_index, MAX_BASE_Z);
    }

    #[test]
    fn unknown_theme_name_uses_default() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            ..Default::default()
        };
        assert_eq!(initialize(&config).theme.name, "catppuccin-mocha");

        let config = Config {
            theme_name: Some("catppuccin-latte".to_string()),
            ..Default::default()
        };
        assert_eq!(initialize(&config).theme.name, "catppuccin-latte");
    }
}
