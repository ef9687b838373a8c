//! Footer component renderer.
//!
//! This module renders the footer bar: the application status, if any, on
//! the left and keybinding hints for the top layer after it.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer bar at the specified row.
///
/// Without a status the keybinding hints are centered. With one, the status
/// is drawn first in the info or error color and the hints fill the rest of
/// the line. Text that does not fit is cut with `…`.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let Some(status) = &footer.status else {
        let text_len = footer.keybindings.chars().count().min(cols);
        let padding = (cols.saturating_sub(text_len)) / 2;
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", " ".repeat(padding));
        print!("{}", fit(&footer.keybindings, cols.saturating_sub(padding)));
        print!("{}", Theme::reset());
        return row + 1;
    };

    let color = if status.is_error {
        &theme.colors.error_fg
    } else {
        &theme.colors.info_fg
    };
    let status_len = status.text.chars().count().min(cols);
    print!("{}", Theme::fg(color));
    print!("{}", fit(&status.text, status_len));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    let rest = cols.saturating_sub(status_len);
    if rest > 3 {
        print!("{}", fit(&format!("   {}", footer.keybindings), rest));
    } else {
        print!("{}", " ".repeat(rest));
    }
    print!("{}", Theme::reset());
    row + 1
}
