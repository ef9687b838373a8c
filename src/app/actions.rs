//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never talks to Zellij itself. It returns a `Vec<Action>`
//! after each event and the plugin shim executes them in order, so every
//! state transition can be exercised in tests without a host.
//!
//! # Example
//!
//! ```rust
//! use gardenia::api::ApiRequest;
//! use gardenia::app::Action;
//!
//! let actions = vec![Action::SendRequest(ApiRequest::list_locations())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::api::ApiRequest;

/// Commands executed by the plugin runtime after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    ///
    /// Sent when the user leaves the plugin with no form open.
    CloseFocus,

    /// Sends a request to the garden REST API.
    ///
    /// The response arrives later as a `WebRequestResult` event carrying the
    /// request's context map.
    SendRequest(ApiRequest),
}
