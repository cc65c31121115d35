//! crates/roster_core/src/availability.rs
//!
//! Answers "who works on day D" over a snapshot of the profile collection.
//! The index borrows the collection and keeps no state of its own.

use crate::domain::{Profile, Weekday};

/// How many profiles are available on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub day: Weekday,
    pub count: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DayAvailabilityIndex<'a> {
    profiles: &'a [Profile],
}

impl<'a> DayAvailabilityIndex<'a> {
    pub fn new(profiles: &'a [Profile]) -> Self {
        Self { profiles }
    }

    /// Every profile available on `day`, in collection order.
    pub fn profiles_on_day(&self, day: Weekday) -> Vec<&'a Profile> {
        self.profiles
            .iter()
            .filter(|profile| profile.available_days.contains(day))
            .collect()
    }

    pub fn count_on_day(&self, day: Weekday) -> usize {
        self.profiles
            .iter()
            .filter(|profile| profile.available_days.contains(day))
            .count()
    }

    /// Per-day counts for the whole week, Monday first.
    pub fn day_counts(&self) -> [DayCount; 7] {
        let mut counts = [0usize; 7];
        for profile in self.profiles {
            for day in profile.available_days.iter() {
                counts[day.index()] += 1;
            }
        }
        Weekday::ALL.map(|day| DayCount {
            day,
            count: counts[day.index()],
        })
    }

    /// All seven days, busiest first. Days with equal counts keep their
    /// Monday to Sunday order.
    pub fn ranked_days_by_popularity(&self) -> Vec<DayCount> {
        let mut ranked = self.day_counts().to_vec();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Total number of (profile, day) availability pairs.
    pub fn total_assignments(&self) -> usize {
        self.profiles.iter().map(Profile::working_days).sum()
    }
}
