//! Header bar renderer.
//!
//! The title sits on the left; the trail of open layers is right-aligned,
//! with the top layer in bold:
//!
//! ```text
//!  Gardenia · placement: manual             Plant › Location › Name
//! ```

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Separator between trail entries.
const CRUMB: &str = " › ";

/// Renders the header bar at `row` and returns the next free row.
///
/// The trail gives way to the title when the pane is narrow.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = format!(" {}", header.title);
    let title_len = title.chars().count().min(cols);

    let (below, top) = match header.trail.split_last() {
        Some((top, rest)) if !rest.is_empty() => (format!("{}{CRUMB}", rest.join(CRUMB)), top.as_str()),
        Some((top, _)) => (String::new(), top.as_str()),
        None => (String::new(), ""),
    };
    let trail_len = below.chars().count() + top.chars().count() + 1;
    let show_trail = !top.is_empty() && title_len + trail_len + 1 <= cols;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}{}", Theme::bold(), fit(&title, title_len));

    if !show_trail {
        print!("{}", " ".repeat(cols - title_len));
        print!("{}", Theme::reset());
        return row + 1;
    }

    // Drop bold for the lower layers, keep the header colors.
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}", " ".repeat(cols - title_len - trail_len));
    print!("{below}");
    print!("{}{}{top} ", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("{}", Theme::reset());
    row + 1
}
