//! Composable UI component renderers.
//!
//! Each component draws one part of the screen at absolute positions, so
//! they can be painted in any order; later output covers earlier output.
//!
//! # Components
//!
//! - [`header`]: Title bar with the stack summary
//! - [`footer`]: Status and keybinding hints
//! - [`layer`]: Bordered box for one form or picker
//! - [`empty`]: Resource menu shown while nothing is open
//!
//! # Layout
//!
//! ```text
//! [Header]
//! [Body: layers painted bottom to top, or the empty state]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod layer;

use crate::app::layout::HEADER_ROWS;
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use layer::render_layer;

/// Row of the empty state message (1-indexed).
const EMPTY_STATE_ROW: usize = 6;

/// Clears the body rows between header and footer.
fn clear_body(first: usize, last: usize, cols: usize) {
    for row in first..=last {
        position_cursor(row, 1);
        print!("{}", " ".repeat(cols));
    }
}

/// Renders the full screen.
///
/// Layers are painted in increasing z-index so a layer always covers the
/// ones beneath it.
pub fn render_screen(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows.max(HEADER_ROWS + 1);
    let body_start = render_header(1, &vm.header, theme, cols);
    clear_body(body_start, footer_row.saturating_sub(1), cols);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(EMPTY_STATE_ROW.min(footer_row.saturating_sub(2)).max(body_start), empty, theme, cols);
    }

    let mut layers: Vec<_> = vm.layers.iter().collect();
    layers.sort_by_key(|layer| layer.z_index);
    for layer in layers {
        render_layer(layer, theme);
    }

    render_footer(footer_row, &vm.footer, theme, cols);
}
