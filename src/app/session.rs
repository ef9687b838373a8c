//! Per-session form preferences.
//!
//! A [`FormSession`] is owned by [`AppState`](crate::app::AppState) and handed
//! to forms when they open pickers or build request bodies. It remembers the
//! placement mode the user chose and the times and run lengths they picked
//! recently, so a second form opens its pickers where the first one left off.

use crate::domain::RunDuration;
use chrono::NaiveTime;
use std::collections::VecDeque;

/// Number of recent picks kept per picker type.
const RECENT_CAPACITY: usize = 5;

/// Time the time picker starts at before anything was picked.
const DEFAULT_START: (u32, u32) = (6, 0);

/// Run length the duration picker starts at before anything was picked.
const DEFAULT_RUN: RunDuration = RunDuration(15);

/// How a plant's location is decided on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// The user picks the location.
    #[default]
    Manual,
    /// The server suggests a location; the location field becomes optional.
    Suggested,
}

impl PlacementMode {
    /// Value sent as `placement` in plant request bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Suggested => "suggested",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Suggested,
            Self::Suggested => Self::Manual,
        }
    }
}

/// Preferences shared by every form opened during one plugin session.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    placement: PlacementMode,
    recent_times: VecDeque<NaiveTime>,
    recent_durations: VecDeque<RunDuration>,
}

impl FormSession {
    /// Creates a session with manual placement and no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current placement mode.
    #[must_use]
    pub const fn placement(&self) -> PlacementMode {
        self.placement
    }

    /// Switches between manual and suggested placement.
    pub fn toggle_placement(&mut self) -> PlacementMode {
        self.placement = self.placement.toggled();
        tracing::debug!(placement = self.placement.as_str(), "placement mode changed");
        self.placement
    }

    /// Records a picked time, most recent first, without duplicates.
    pub fn remember_time(&mut self, time: NaiveTime) {
        remember(&mut self.recent_times, time);
    }

    /// Records a picked run length, most recent first, without duplicates.
    pub fn remember_duration(&mut self, duration: RunDuration) {
        remember(&mut self.recent_durations, duration);
    }

    /// Time a new time picker opens at.
    #[must_use]
    pub fn seed_time(&self) -> NaiveTime {
        self.recent_times.front().copied().unwrap_or_else(|| {
            NaiveTime::from_hms_opt(DEFAULT_START.0, DEFAULT_START.1, 0).unwrap_or(NaiveTime::MIN)
        })
    }

    /// Run length a new duration picker opens at.
    #[must_use]
    pub fn seed_duration(&self) -> RunDuration {
        self.recent_durations.front().copied().unwrap_or(DEFAULT_RUN)
    }

    /// Recently picked times, most recent first.
    pub fn recent_times(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        self.recent_times.iter().copied()
    }

    /// Recently picked run lengths, most recent first.
    pub fn recent_durations(&self) -> impl Iterator<Item = RunDuration> + '_ {
        self.recent_durations.iter().copied()
    }
}

fn remember<T: PartialEq>(recent: &mut VecDeque<T>, value: T) {
    recent.retain(|seen| *seen != value);
    recent.push_front(value);
    recent.truncate(RECENT_CAPACITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn seeds_fall_back_to_defaults() {
        let session = FormSession::new();
        assert_eq!(session.seed_time(), time(6, 0));
        assert_eq!(session.seed_duration(), RunDuration(15));
        assert_eq!(session.placement(), PlacementMode::Manual);
    }

    #[test]
    fn recent_picks_are_deduplicated_and_bounded() {
        let mut session = FormSession::new();
        for minute in [0, 5, 10, 15, 20, 25] {
            session.remember_time(time(7, minute));
        }
        session.remember_time(time(7, 10));

        let recent: Vec<_> = session.recent_times().collect();
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent[0], time(7, 10));
        assert_eq!(recent.iter().filter(|t| **t == time(7, 10)).count(), 1);
        assert_eq!(session.seed_time(), time(7, 10));
    }

    #[test]
    fn placement_toggles() {
        let mut session = FormSession::new();
        assert_eq!(session.toggle_placement(), PlacementMode::Suggested);
        assert_eq!(session.toggle_placement(), PlacementMode::Manual);
    }
}
