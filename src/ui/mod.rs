//! Terminal rendering of the layer stack.
//!
//! Rendering never reads the registry directly: [`AppState::compute_viewmodel`]
//! takes one stack snapshot and resolves every layer's z-index, rectangle and
//! render mode, and the components paint that view model back to front.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! [`AppState::compute_viewmodel`]: crate::app::AppState::compute_viewmodel
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, fitting text)
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    EmptyState, FieldView, FooterInfo, FormView, HeaderInfo, LayerBody, LayerView, StatusLine, UIViewModel,
};
