//! Nested pickers injected above forms.
//!
//! Pickers are short-lived layers: a form injects one through
//! [`LayerScope::add_layer`](crate::layers::LayerScope::add_layer), forwards
//! keys to it while it is on top, and removes it once it reports a selection
//! or a cancellation. Pickers know nothing about stacking; they only turn keys
//! into a [`PickerOutcome`].
//!
//! # Modules
//!
//! - [`time`]: Time-of-day picker (hour and minute columns)
//! - [`duration`]: Run-length picker over preset lengths
//! - [`location`]: Fuzzy-searchable location list

pub mod duration;
pub mod location;
pub mod time;

pub use duration::DurationPicker;
pub use location::LocationPicker;
pub use time::TimePicker;

use crate::domain::FieldValue;
use crate::layers::PickerOutcome;
use std::fmt;

/// Keys a picker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    /// Move up / increase.
    Up,
    /// Move down / decrease.
    Down,
    /// Previous column.
    Left,
    /// Next column.
    Right,
    /// Confirm.
    Enter,
    /// Back out.
    Escape,
    /// Delete the last typed character.
    Backspace,
    /// A typed character.
    Char(char),
}

/// One rendered line of a picker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerLine {
    /// Text of the line.
    pub text: String,
    /// Whether the line is the picker's cursor.
    pub is_selected: bool,
    /// Character ranges to highlight (fuzzy matches).
    pub highlight_ranges: Vec<(usize, usize)>,
}

impl PickerLine {
    /// Plain, unselected line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Line drawn as the cursor position.
    pub fn selected(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_selected: true,
            highlight_ranges: vec![],
        }
    }
}

/// A component that can be mounted as an injected layer.
pub trait Picker: fmt::Debug {
    /// Title drawn in the picker's border.
    fn title(&self) -> &str;

    /// Handles one key and reports whether a value was chosen.
    fn handle_key(&mut self, key: PickerKey) -> PickerOutcome<FieldValue>;

    /// Body lines, top to bottom.
    fn lines(&self) -> Vec<PickerLine>;

    /// Width of the body in columns.
    fn width(&self) -> usize {
        self.lines()
            .iter()
            .map(|line| line.text.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.title().chars().count() + 3)
    }
}

/// Renderable stored in the layer registry for injected pickers.
pub type PickerBox = Box<dyn Picker>;
