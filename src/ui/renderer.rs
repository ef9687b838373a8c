//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Uses the viewport last passed to [`AppState::resize`]. Prints ANSI-styled
/// output with absolute cursor positioning.
pub fn render(state: &AppState) {
    let viewmodel = state.compute_viewmodel();
    components::render_screen(&viewmodel, &state.theme, state.viewport.cols, state.viewport.rows);
}
