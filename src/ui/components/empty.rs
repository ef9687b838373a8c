//! Empty state component renderer.
//!
//! This module renders the resource menu shown while no form is open.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the empty state message.
///
/// Displays a centered two-line message. The message uses the
/// `empty_state_fg` theme color, and the subtitle uses `text_dim` with dim
/// styling.
///
/// # Layout
///
/// ```text
/// [left padding] MESSAGE [right padding]     ← row
/// [left padding] subtitle [right padding]    ← row + 1
/// ```
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    let msg_len = empty.message.chars().count().min(cols);
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{}", fit(&empty.message, cols.saturating_sub(msg_padding)));
    print!("{}", Theme::reset());

    let sub_len = empty.subtitle.chars().count().min(cols);
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    position_cursor(row + 1, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(sub_padding));
    print!("{}", fit(&empty.subtitle, cols.saturating_sub(sub_padding)));
    print!("{}", Theme::reset());
}
