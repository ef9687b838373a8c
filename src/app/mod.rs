//! Application layer coordinating forms, events, and actions.
//!
//! This module sits between the plugin runtime (main.rs) and the layer stack.
//! It owns the open forms, routes input to whichever layer is on top, and
//! turns submits into REST requests.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └────────── API Responses ─────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`forms`]: Modal resource forms and their injected pickers
//! - [`handler`]: Event processing and routing by top layer
//! - [`layout`]: Screen placement of forms and pickers
//! - [`session`]: Per-session form preferences
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod forms;
pub mod handler;
pub mod layout;
pub mod session;
pub mod state;

pub use actions::Action;
pub use forms::{FieldTarget, FormState, FormStatus};
pub use handler::{handle_event, Event};
pub use layout::Viewport;
pub use session::{FormSession, PlacementMode};
pub use state::AppState;
