//! Time-of-day picker.

use chrono::{NaiveTime, Timelike};

use super::{Picker, PickerKey, PickerLine};
use crate::domain::FieldValue;
use crate::layers::PickerOutcome;

/// Minute increment of the minute column.
const MINUTE_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Hour,
    Minute,
}

/// Picks an hour and a minute in two columns.
///
/// Up/Down change the focused column, Left/Right switch columns, Enter
/// selects, Escape cancels. Digits typed in sequence set the time directly
/// (`0`, `6`, `3`, `0` selects 06:30).
#[derive(Debug, Clone)]
pub struct TimePicker {
    hour: u32,
    minute: u32,
    column: Column,
    typed: String,
}

impl TimePicker {
    /// Creates a picker positioned at `initial`.
    #[must_use]
    pub fn new(initial: NaiveTime) -> Self {
        Self {
            hour: initial.hour(),
            minute: initial.minute(),
            column: Column::Hour,
            typed: String::new(),
        }
    }

    /// Time currently under the cursor.
    #[must_use]
    pub fn current(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    fn step(&mut self, up: bool) {
        match (self.column, up) {
            (Column::Hour, true) => self.hour = (self.hour + 1) % 24,
            (Column::Hour, false) => self.hour = (self.hour + 23) % 24,
            (Column::Minute, true) => {
                self.minute = (self.minute / MINUTE_STEP * MINUTE_STEP + MINUTE_STEP) % 60;
            }
            (Column::Minute, false) => {
                let floored = self.minute / MINUTE_STEP * MINUTE_STEP;
                self.minute = if floored == self.minute {
                    (self.minute + 60 - MINUTE_STEP) % 60
                } else {
                    floored
                };
            }
        }
    }

    fn type_digit(&mut self, digit: char) -> PickerOutcome<FieldValue> {
        self.typed.push(digit);
        if self.typed.len() < 4 {
            return PickerOutcome::Pending;
        }

        let parsed = NaiveTime::parse_from_str(&self.typed, "%H%M");
        self.typed.clear();
        match parsed {
            Ok(time) => {
                self.hour = time.hour();
                self.minute = time.minute();
                PickerOutcome::Selected(FieldValue::Time(time))
            }
            Err(e) => {
                tracing::debug!(error = %e, "typed time rejected");
                PickerOutcome::Pending
            }
        }
    }
}

impl Picker for TimePicker {
    fn title(&self) -> &str {
        "Time"
    }

    fn handle_key(&mut self, key: PickerKey) -> PickerOutcome<FieldValue> {
        match key {
            PickerKey::Up => self.step(true),
            PickerKey::Down => self.step(false),
            PickerKey::Left => self.column = Column::Hour,
            PickerKey::Right => self.column = Column::Minute,
            PickerKey::Enter => return PickerOutcome::Selected(FieldValue::Time(self.current())),
            PickerKey::Escape => return PickerOutcome::Cancelled,
            PickerKey::Backspace => {
                self.typed.pop();
            }
            PickerKey::Char(c) if c.is_ascii_digit() => return self.type_digit(c),
            PickerKey::Char(_) => {}
        }
        PickerOutcome::Pending
    }

    fn lines(&self) -> Vec<PickerLine> {
        let (hour, minute) = match self.column {
            Column::Hour => (format!("[{:02}]", self.hour), format!(" {:02} ", self.minute)),
            Column::Minute => (format!(" {:02} ", self.hour), format!("[{:02}]", self.minute)),
        };
        let mut lines = vec![
            PickerLine::plain("  ▲     ▲"),
            PickerLine::selected(format!(" {hour} : {minute}")),
            PickerLine::plain("  ▼     ▼"),
        ];
        if !self.typed.is_empty() {
            lines.push(PickerLine::plain(format!(" typed: {}", self.typed)));
        }
        lines
    }
}
