//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the Gardenia library
//! and the Zellij plugin system. It implements the `ZellijPlugin` trait to
//! translate Zellij events into library events and library actions into Zellij
//! calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, Mouse, `WebRequestResult` and
//!    `PermissionRequestResult` events
//! 3. **Permissions**: Once web access is granted, fetch the location list
//! 4. **Update**: Handle events, delegate to library layer, execute actions
//! 5. **Render**: Resize the layout and call the library render function
//!
//! # Event Mapping
//!
//! - `Key` → navigation, editing and shortcut events (see below)
//! - `Mouse(LeftClick)` → `Event::Click { line, col }`
//! - `WebRequestResult` → `Event::ApiResponse`, decoded with the request's
//!   context map
//! - `PermissionRequestResult` → `Event::PermissionsResult`
//!
//! # Keybindings
//!
//! Global:
//! - `Tab` / `Shift+Tab`: Next / previous field
//! - `Ctrl+s`: Submit the top form
//! - `Ctrl+n`: New location from a location field
//! - `Ctrl+t`: Toggle manual/suggested placement
//! - `Esc`: Close the top layer
//!
//! With no form open:
//! - `p` / `z` / `l` / `s`: New plant, zone, location, schedule
//! - `r`: Reload locations
//! - `q`: Close plugin

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use gardenia::api::Method;
use gardenia::{handle_event, Action, ApiRequest, ApiResponse, Config, Event};

register_plugin!(State);

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with the configured API location.
struct State {
    /// Core application state from library layer.
    app: gardenia::AppState,

    /// Base URL every request is sent below.
    api_url: String,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: gardenia::initialize(&default_config),
            api_url: default_config.api_url,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// Requests `WebAccess` for the REST API.
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `Mouse`: Clicks for focus and outside-click dismissal
    /// - `WebRequestResult`: REST responses
    /// - `PermissionRequestResult`: Permission grant
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        gardenia::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(api_url = %config.api_url, base_z = config.base_z_index, "parsed configuration");
        self.app = gardenia::initialize(&config);
        self.api_url.clone_from(&config.api_url);

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess]);

        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` when the handler asked for a render or the layer stack
    /// changed since the last frame.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Mouse(mouse) => match Self::map_mouse_event(mouse) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Event::ApiResponse(ApiResponse::decode(status, &body, &context))
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                let granted = permissions == PermissionStatus::Granted;
                if !granted {
                    tracing::warn!("web access denied - forms cannot be saved");
                }
                Event::PermissionsResult { granted }
            }
            _ => return false,
        };

        self.dispatch(&our_event) || self.app.provider().take_changed()
    }

    /// Renders the plugin UI.
    fn render(&mut self, rows: usize, cols: usize) {
        if let Err(e) = self.app.resize(rows, cols) {
            tracing::debug!(error = %e, "failed to lay out layers");
        }
        gardenia::ui::render(&self.app);
    }
}

impl State {
    /// Runs `event` through the library and executes the resulting actions.
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                let mut render = should_render;
                for a in actions {
                    render |= self.execute_action(&a);
                }
                render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(_) => "Mouse".to_string(),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('s') => Some(Event::Submit),
                BareKey::Char('n') => Some(Event::NewLocation),
                BareKey::Char('t') => Some(Event::TogglePlacement),
                _ => None,
            };
        }
        if key.bare_key == BareKey::Tab && key.has_modifiers(&[KeyModifier::Shift]) {
            return Some(Event::PrevField);
        }

        Some(match key.bare_key {
            BareKey::Tab => Event::NextField,
            BareKey::Up => Event::Up,
            BareKey::Down => Event::Down,
            BareKey::Left => Event::Left,
            BareKey::Right => Event::Right,
            BareKey::Enter => Event::Enter,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    /// Maps mouse events to application events; only left clicks matter.
    fn map_mouse_event(mouse: Mouse) -> Option<Event> {
        match mouse {
            Mouse::LeftClick(line, col) => {
                let line = usize::try_from(line).ok()?;
                tracing::debug!(line, col, "left click");
                Some(Event::Click { line, col })
            }
            _ => None,
        }
    }

    /// Sends `request` through Zellij's web API.
    ///
    /// A request that cannot be built never leaves the plugin; its failure is
    /// fed back through the handler so the owning form shows it. Returns
    /// whether that feedback needs a render.
    fn send_request(&mut self, request: &ApiRequest) -> bool {
        let prepared = request
            .url(&self.api_url)
            .and_then(|url| Ok((url, request.body_bytes()?)));

        match prepared {
            Ok((url, body)) => {
                let verb = match request.method() {
                    Method::Get => HttpVerb::Get,
                    Method::Post => HttpVerb::Post,
                };
                tracing::debug!(request = request.name(), url = %url, body_len = body.len(), "sending web request");
                web_request(url, verb, request.headers(), body, request.context());
                false
            }
            Err(e) => {
                tracing::warn!(request = request.name(), error = %e, "failed to build request");
                let failed = ApiResponse::Failed {
                    origin: request.origin().cloned(),
                    message: e.to_string(),
                };
                self.dispatch(&Event::ApiResponse(failed))
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// # Actions
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `SendRequest`: Issue a `web_request`
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) -> bool {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
                false
            }
            Action::SendRequest(ref request) => self.send_request(request),
        }
    }
}
