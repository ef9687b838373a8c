//! Layer box renderer.
//!
//! Draws one form or picker as a bordered box at its rectangle. The top layer
//! gets the active border color and full contrast; every other layer is
//! drawn dimmed so it reads as background.

use crate::layers::RenderMode;
use crate::pickers::PickerLine;
use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FieldView, FormView, LayerBody, LayerView, StatusLine};

/// Columns reserved for field labels.
const LABEL_WIDTH: usize = 13;

/// Placeholder shown in empty picker-backed fields.
const PICK_HINT: &str = "‹enter to pick›";

/// Renders a layer box, border included.
pub fn render_layer(layer: &LayerView, theme: &Theme) {
    let rect = layer.rect;
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let inner = rect.width - 2;
    let active = layer.mode == RenderMode::Active;

    let border = match (&layer.body, active) {
        (_, false) => &theme.colors.border,
        (LayerBody::Picker(_), true) => &theme.colors.picker_border,
        (LayerBody::Form(_), true) => &theme.colors.border_active,
    };
    let style = |extra: &str| {
        let dim = if active { "" } else { Theme::dim() };
        format!("{dim}{}{extra}", Theme::fg(border))
    };

    // Top border with the title.
    position_cursor(rect.y + 1, rect.x + 1);
    let mut title = format!(" {} ", layer.title);
    if title.chars().count() >= inner {
        title = fit(&title, inner.saturating_sub(1));
    }
    let title_len = title.chars().count();
    print!("{}┌─", style(if active { Theme::bold() } else { "" }));
    print!("{title}");
    print!("{}", "─".repeat(inner.saturating_sub(1 + title_len)));
    print!("┐{}", Theme::reset());

    let rows = rect.height - 2;
    for offset in 0..rows {
        position_cursor(rect.y + 2 + offset, rect.x + 1);
        print!("{}│{}", style(""), Theme::reset());
        match &layer.body {
            LayerBody::Form(form) => render_form_row(form, offset, rows, inner, active, theme),
            LayerBody::Picker(lines) => render_picker_row(lines.get(offset), inner, active, theme),
        }
        print!("{}│{}", style(""), Theme::reset());
    }

    position_cursor(rect.y + rect.height, rect.x + 1);
    print!("{}└{}┘{}", style(""), "─".repeat(inner), Theme::reset());
}

/// Rows inside a form: blank, fields, blank, status.
fn render_form_row(form: &FormView, offset: usize, rows: usize, width: usize, active: bool, theme: &Theme) {
    let status_row = rows.saturating_sub(1);
    if offset == status_row && offset > form.fields.len() {
        render_status(form.status.as_ref(), width, theme, active);
        return;
    }

    match offset.checked_sub(1).and_then(|index| form.fields.get(index)) {
        Some(field) => render_field(field, width, active, theme),
        None => print!("{}", " ".repeat(width)),
    }
}

fn render_field(field: &FieldView, width: usize, active: bool, theme: &Theme) {
    let marker = if field.is_required { "*" } else { " " };
    let label = fit(&format!(" {}{marker}", field.label), LABEL_WIDTH);
    let value_width = width.saturating_sub(LABEL_WIDTH + 1);

    let (value, placeholder) = if field.value.is_empty() && field.has_picker {
        (PICK_HINT, true)
    } else {
        (field.value.as_str(), false)
    };

    if !active {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
        print!("{label} {}", fit(value, value_width));
        print!("{}", Theme::reset());
        return;
    }

    print!("{}{label}{} ", Theme::fg(&theme.colors.label_fg), Theme::reset());
    if field.is_focused {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else if placeholder {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
    print!("{}", fit(value, value_width));
    print!("{}", Theme::reset());
}

fn render_status(status: Option<&StatusLine>, width: usize, theme: &Theme, active: bool) {
    let Some(status) = status else {
        print!("{}", " ".repeat(width));
        return;
    };
    let color = if status.is_error {
        &theme.colors.error_fg
    } else {
        &theme.colors.info_fg
    };
    if !active {
        print!("{}", Theme::dim());
    }
    print!("{}", Theme::fg(color));
    print!("{}", fit(&format!(" {}", status.text), width));
    print!("{}", Theme::reset());
}

fn render_picker_row(line: Option<&PickerLine>, width: usize, active: bool, theme: &Theme) {
    let Some(line) = line else {
        print!("{}", " ".repeat(width));
        return;
    };

    let text = fit(&line.text, width);
    let selected = active && line.is_selected;
    if selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else if active {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    } else {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    }

    if active {
        helpers::render_highlighted_text(&text, &line.highlight_ranges, theme, selected);
    } else {
        print!("{text}");
    }
    print!("{}", Theme::reset());
}
