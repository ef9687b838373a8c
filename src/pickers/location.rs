//! Fuzzy-searchable location picker.
//!
//! Filters the locations fetched from the API by a typed query. Every
//! whitespace-separated token has to fuzzy-match the location name, and the
//! matched characters of the first token are highlighted.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::{Picker, PickerKey, PickerLine};
use crate::domain::FieldValue;
use crate::layers::PickerOutcome;

/// Rows of results shown at once.
const VISIBLE_ROWS: usize = 8;

/// Lists known locations and narrows them as the user types.
pub struct LocationPicker {
    locations: Vec<String>,
    query: String,
    filtered: Vec<usize>,
    selected: usize,
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for LocationPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationPicker")
            .field("locations", &self.locations.len())
            .field("query", &self.query)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl LocationPicker {
    /// Creates a picker over `locations`, cursor on `current` when present.
    #[must_use]
    pub fn new(locations: Vec<String>, current: Option<&str>) -> Self {
        let mut picker = Self {
            locations,
            query: String::new(),
            filtered: vec![],
            selected: 0,
            matcher: SkimMatcherV2::default(),
        };
        picker.apply_filter();
        if let Some(current) = current {
            if let Some(index) = picker
                .filtered
                .iter()
                .position(|&i| picker.locations[i] == current)
            {
                picker.selected = index;
            }
        }
        picker
    }

    /// Location under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.filtered
            .get(self.selected)
            .map(|&index| self.locations[index].as_str())
    }

    /// Number of locations matching the query.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    fn apply_filter(&mut self) {
        let tokens: Vec<String> = self
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        self.filtered = self
            .locations
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                let name = name.to_lowercase();
                tokens
                    .iter()
                    .all(|token| self.matcher.fuzzy_match(&name, token).is_some())
            })
            .map(|(index, _)| index)
            .collect();

        if self.filtered.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.filtered.len() - 1);
        }

        tracing::debug!(query = %self.query, matches = self.filtered.len(), "location filter applied");
    }

    fn highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let Some(token) = self.query.split_whitespace().next() else {
            return vec![];
        };
        let Some((_score, indices)) = self.matcher.fuzzy_indices(&text.to_lowercase(), &token.to_lowercase())
        else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for index in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == index => *end = index + 1,
                _ => ranges.push((index, index + 1)),
            }
        }
        ranges
    }

    fn window_start(&self) -> usize {
        if self.filtered.len() <= VISIBLE_ROWS {
            return 0;
        }
        self.selected
            .saturating_sub(VISIBLE_ROWS / 2)
            .min(self.filtered.len() - VISIBLE_ROWS)
    }
}

impl Picker for LocationPicker {
    fn title(&self) -> &str {
        "Location"
    }

    fn handle_key(&mut self, key: PickerKey) -> PickerOutcome<FieldValue> {
        match key {
            PickerKey::Up if !self.filtered.is_empty() => {
                self.selected = (self.selected + self.filtered.len() - 1) % self.filtered.len();
            }
            PickerKey::Down if !self.filtered.is_empty() => {
                self.selected = (self.selected + 1) % self.filtered.len();
            }
            PickerKey::Enter => {
                return self.current().map_or(PickerOutcome::Pending, |name| {
                    PickerOutcome::Selected(FieldValue::Location(name.to_string()))
                });
            }
            PickerKey::Escape => return PickerOutcome::Cancelled,
            PickerKey::Backspace => {
                self.query.pop();
                self.apply_filter();
            }
            PickerKey::Char(c) => {
                self.query.push(c);
                self.apply_filter();
            }
            PickerKey::Up | PickerKey::Down | PickerKey::Left | PickerKey::Right => {}
        }
        PickerOutcome::Pending
    }

    fn lines(&self) -> Vec<PickerLine> {
        let mut lines = vec![PickerLine::plain(format!("/ {}", self.query))];

        if self.filtered.is_empty() {
            lines.push(PickerLine::plain("  no matching locations"));
            return lines;
        }

        let start = self.window_start();
        for (offset, &index) in self.filtered.iter().skip(start).take(VISIBLE_ROWS).enumerate() {
            let name = &self.locations[index];
            let text = format!("  {name}");
            let highlight_ranges = self
                .highlight_ranges(name)
                .into_iter()
                .map(|(s, e)| (s + 2, e + 2))
                .collect();
            lines.push(PickerLine {
                text,
                is_selected: start + offset == self.selected,
                highlight_ranges,
            });
        }
        lines
    }

    fn width(&self) -> usize {
        self.locations
            .iter()
            .map(|name| name.chars().count() + 4)
            .max()
            .unwrap_or(0)
            .max(self.query.chars().count() + 4)
            .max(26)
    }
}
