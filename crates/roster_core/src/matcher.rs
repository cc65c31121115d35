//! crates/roster_core/src/matcher.rs
//!
//! Finds colleagues whose week overlaps a chosen set of days and ranks them
//! by how many of those days they cover.

use crate::domain::{DaySet, Profile, Weekday};
use crate::stats::{rounded_percent, rounded_ratio};

/// One candidate in a match report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMatch<'a> {
    pub profile: &'a Profile,
    /// Selected days the profile is available on.
    pub matching_days: DaySet,
    /// Days the profile works that were not selected.
    pub extra_days: DaySet,
    /// Share of the selected days covered, 0..=100.
    pub match_percent: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub total: usize,
    /// Candidates available on every selected day.
    pub perfect: usize,
    pub partial: usize,
    /// Mean coverage across candidates, `None` when nobody matched.
    pub average_match_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport<'a> {
    pub selected: DaySet,
    pub matches: Vec<ScheduleMatch<'a>>,
    pub summary: MatchSummary,
}

/// Holds the current day selection and ranks a collection against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleMatcher {
    selected: DaySet,
}

impl ScheduleMatcher {
    pub fn new(selected: DaySet) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> DaySet {
        self.selected
    }

    /// Adds `day` to the selection, or removes it if already selected.
    pub fn toggle(&mut self, day: Weekday) {
        self.selected.toggle(day);
    }

    pub fn run<'a>(&self, profiles: &'a [Profile]) -> MatchReport<'a> {
        let selected = self.selected;
        if selected.is_empty() {
            return MatchReport {
                selected,
                matches: Vec::new(),
                summary: MatchSummary::default(),
            };
        }

        let mut matches: Vec<ScheduleMatch<'a>> = profiles
            .iter()
            .filter(|profile| profile.available_days.intersects(&selected))
            .map(|profile| {
                let matching_days = profile.available_days.intersection(&selected);
                ScheduleMatch {
                    profile,
                    matching_days,
                    extra_days: profile.available_days.difference(&selected),
                    match_percent: rounded_percent(matching_days.len(), selected.len())
                        .unwrap_or_default(),
                }
            })
            .collect();
        // Stable: equal overlaps stay in collection order.
        matches.sort_by(|a, b| b.matching_days.len().cmp(&a.matching_days.len()));

        let summary = summarize(&matches, selected);
        MatchReport {
            selected,
            matches,
            summary,
        }
    }
}

fn summarize(matches: &[ScheduleMatch<'_>], selected: DaySet) -> MatchSummary {
    let perfect = matches
        .iter()
        .filter(|m| m.matching_days.len() == selected.len())
        .count();
    // Mean of the exact per-candidate ratios, rounded once at the end.
    let matched_days: usize = matches.iter().map(|m| m.matching_days.len()).sum();
    let average_match_percent = rounded_ratio(matched_days * 100, selected.len() * matches.len())
        .map(|percent| percent as u32);

    MatchSummary {
        total: matches.len(),
        perfect,
        partial: matches.len() - perfect,
        average_match_percent,
    }
}

/// Convenience wrapper for a one-off match.
pub fn match_schedule(profiles: &[Profile], selected: DaySet) -> MatchReport<'_> {
    ScheduleMatcher::new(selected).run(profiles)
}
