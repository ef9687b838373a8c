//! Screen placement of forms and pickers.
//!
//! Forms cascade down and to the right in the order they were opened, so each
//! newer form partly covers the previous one. Pickers are placed beside the
//! field that opened them and may reach past their form's edge; they are
//! positioned independently of the form's box.

use crate::layers::{Point, Rect};

/// Lines used by the header bar.
pub const HEADER_ROWS: usize = 1;

/// Lines used by the footer bar.
pub const FOOTER_ROWS: usize = 1;

/// Preferred outer width of a form box.
pub const FORM_WIDTH: usize = 48;

/// Line offset of the first field inside a form box (border, blank line).
pub const FIELD_OFFSET: usize = 2;

/// Horizontal step between cascaded forms.
const CASCADE_X: usize = 4;

/// Vertical step between cascaded forms.
const CASCADE_Y: usize = 2;

/// Columns of the form a picker overlaps when placed beside it.
const PICKER_OVERLAP: usize = 6;

/// Size of the plugin pane in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Pane height.
    pub rows: usize,
    /// Pane width.
    pub cols: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

impl Viewport {
    /// Lines available between header and footer.
    #[must_use]
    pub const fn body_rows(&self) -> usize {
        self.rows.saturating_sub(HEADER_ROWS + FOOTER_ROWS)
    }

    /// First line past the body area.
    #[must_use]
    pub const fn body_bottom(&self) -> usize {
        self.rows.saturating_sub(FOOTER_ROWS)
    }
}

/// Outer height of a form with `field_count` fields.
///
/// Border, blank line, one line per field, blank line, status line, border.
#[must_use]
pub const fn form_height(field_count: usize) -> usize {
    field_count + FIELD_OFFSET + 3
}

/// Rectangle of the form opened `slot`-th among the open forms.
#[must_use]
pub fn form_rect(slot: usize, field_count: usize, viewport: Viewport) -> Rect {
    let width = FORM_WIDTH.min(viewport.cols.saturating_sub(2)).max(1);
    let height = form_height(field_count).min(viewport.body_rows()).max(1);

    let max_x = viewport.cols.saturating_sub(width);
    let max_y = viewport.body_bottom().saturating_sub(height).max(HEADER_ROWS);

    let x = (2 + slot * CASCADE_X).min(max_x);
    let y = (HEADER_ROWS + 1 + slot * CASCADE_Y).min(max_y);
    Rect::new(x, y, width, height)
}

/// Line a field is drawn on.
#[must_use]
pub const fn field_line(form: Rect, field: usize) -> usize {
    form.y + FIELD_OFFSET + field
}

/// Field under `point`, if the point is on a field line inside the form.
#[must_use]
pub fn field_at(form: Rect, field_count: usize, point: Point) -> Option<usize> {
    if !form.contains(point) || point.y < form.y + FIELD_OFFSET {
        return None;
    }
    let field = point.y - form.y - FIELD_OFFSET;
    (field < field_count).then_some(field)
}

/// Rectangle of a picker opened from the field on `line` of `form`.
///
/// `body_width` and `body_lines` exclude the border. The picker sits to the
/// right of the form, overlapping its edge, and shifts left or up to stay on
/// screen.
#[must_use]
pub fn picker_rect(form: Rect, line: usize, body_width: usize, body_lines: usize, viewport: Viewport) -> Rect {
    let width = (body_width + 2).min(viewport.cols).max(3);
    let height = (body_lines + 2).min(viewport.body_rows()).max(3);

    let preferred_x = form.right().saturating_sub(PICKER_OVERLAP);
    let x = preferred_x.min(viewport.cols.saturating_sub(width));

    let max_y = viewport.body_bottom().saturating_sub(height).max(HEADER_ROWS);
    let y = line.min(max_y);
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Viewport = Viewport { rows: 30, cols: 100 };

    #[test]
    fn forms_cascade() {
        let first = form_rect(0, 4, SCREEN);
        let second = form_rect(1, 2, SCREEN);
        assert_eq!(first, Rect::new(2, 2, FORM_WIDTH, 9));
        assert_eq!((second.x, second.y), (6, 4));
    }

    #[test]
    fn cascade_stays_on_screen() {
        let rect = form_rect(40, 4, SCREEN);
        assert!(rect.right() <= SCREEN.cols);
        assert!(rect.bottom() <= SCREEN.body_bottom());
    }

    #[test]
    fn fields_are_hit_by_line() {
        let form = form_rect(0, 4, SCREEN);
        assert_eq!(field_at(form, 4, Point::new(form.x + 3, field_line(form, 2))), Some(2));
        assert_eq!(field_at(form, 4, Point::new(form.x + 3, form.y)), None);
        assert_eq!(field_at(form, 4, Point::new(form.x + 3, field_line(form, 4))), None);
        assert_eq!(field_at(form, 4, Point::new(0, field_line(form, 1))), None);
    }

    #[test]
    fn picker_overhangs_its_form() {
        let form = form_rect(0, 4, SCREEN);
        let picker = picker_rect(form, field_line(form, 2), 20, 5, SCREEN);
        assert!(picker.x < form.right());
        assert!(picker.right() > form.right());
        assert_eq!(picker.y, field_line(form, 2));
    }

    #[test]
    fn picker_shifts_to_fit() {
        let small = Viewport { rows: 12, cols: 50 };
        let form = form_rect(0, 4, small);
        let picker = picker_rect(form, 9, 20, 8, small);
        assert!(picker.right() <= small.cols);
        assert!(picker.bottom() <= small.body_bottom());
    }
}
