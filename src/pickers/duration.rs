//! Run-length picker.

use super::{Picker, PickerKey, PickerLine};
use crate::domain::{FieldValue, RunDuration};
use crate::layers::PickerOutcome;

/// Lengths offered by default, in minutes.
const PRESETS: [u32; 9] = [5, 10, 15, 20, 30, 45, 60, 90, 120];

/// Longest run the picker allows, in minutes.
const MAX_MINUTES: u32 = 240;

/// Picks a run length from presets, fine-tuned one minute at a time.
///
/// Up/Down walk the preset list, Left/Right (or `-`/`+`) adjust the current
/// length by one minute, Enter selects, Escape cancels.
#[derive(Debug, Clone)]
pub struct DurationPicker {
    minutes: u32,
}

impl DurationPicker {
    /// Creates a picker positioned at `initial`.
    #[must_use]
    pub fn new(initial: RunDuration) -> Self {
        Self {
            minutes: initial.minutes().clamp(1, MAX_MINUTES),
        }
    }

    /// Length currently under the cursor.
    #[must_use]
    pub const fn current(&self) -> RunDuration {
        RunDuration(self.minutes)
    }

    fn next_preset(&self) -> u32 {
        PRESETS
            .iter()
            .copied()
            .find(|&preset| preset > self.minutes)
            .unwrap_or(self.minutes)
    }

    fn previous_preset(&self) -> u32 {
        PRESETS
            .iter()
            .rev()
            .copied()
            .find(|&preset| preset < self.minutes)
            .unwrap_or(self.minutes)
    }
}

impl Picker for DurationPicker {
    fn title(&self) -> &str {
        "Run time"
    }

    fn handle_key(&mut self, key: PickerKey) -> PickerOutcome<FieldValue> {
        match key {
            PickerKey::Up => self.minutes = self.previous_preset(),
            PickerKey::Down => self.minutes = self.next_preset(),
            PickerKey::Left | PickerKey::Char('-') => self.minutes = self.minutes.saturating_sub(1).max(1),
            PickerKey::Right | PickerKey::Char('+') => self.minutes = (self.minutes + 1).min(MAX_MINUTES),
            PickerKey::Enter => return PickerOutcome::Selected(FieldValue::Duration(self.current())),
            PickerKey::Escape => return PickerOutcome::Cancelled,
            PickerKey::Backspace | PickerKey::Char(_) => {}
        }
        PickerOutcome::Pending
    }

    fn lines(&self) -> Vec<PickerLine> {
        let mut lines: Vec<PickerLine> = PRESETS
            .iter()
            .map(|&preset| {
                let text = format!(" {:>12} ", RunDuration(preset).to_string());
                if preset == self.minutes {
                    PickerLine::selected(text)
                } else {
                    PickerLine::plain(text)
                }
            })
            .collect();

        if !PRESETS.contains(&self.minutes) {
            lines.push(PickerLine::selected(format!(" {:>12} ", self.current().to_string())));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_presets() {
        let mut picker = DurationPicker::new(RunDuration(15));
        picker.handle_key(PickerKey::Down);
        assert_eq!(picker.current(), RunDuration(20));
        picker.handle_key(PickerKey::Up);
        picker.handle_key(PickerKey::Up);
        assert_eq!(picker.current(), RunDuration(10));
    }

    #[test]
    fn fine_tunes_between_presets() {
        let mut picker = DurationPicker::new(RunDuration(15));
        picker.handle_key(PickerKey::Char('+'));
        picker.handle_key(PickerKey::Right);
        assert_eq!(picker.current(), RunDuration(17));
        assert!(picker.lines().iter().any(|l| l.is_selected && l.text.contains("17 min")));

        picker.handle_key(PickerKey::Down);
        assert_eq!(picker.current(), RunDuration(20));
    }

    #[test]
    fn never_drops_below_one_minute() {
        let mut picker = DurationPicker::new(RunDuration(0));
        assert_eq!(picker.current(), RunDuration(1));
        picker.handle_key(PickerKey::Left);
        assert_eq!(picker.current(), RunDuration(1));
        assert_eq!(
            picker.handle_key(PickerKey::Enter),
            PickerOutcome::Selected(FieldValue::Duration(RunDuration(1)))
        );
    }
}
