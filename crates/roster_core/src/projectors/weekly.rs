//! The weekly distribution view: per-day headcounts, the busiest and quietest
//! days, and a per-day staff listing.

use crate::availability::{DayAvailabilityIndex, DayCount};
use crate::domain::{Profile, Weekday};
use crate::stats::{rounded_percent, rounded_ratio};

/// One bar of the distribution chart, scaled against the busiest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBar {
    pub day: Weekday,
    pub count: usize,
    pub percent_of_busiest: u32,
}

/// Everyone working on one day, with their full week for context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail<'a> {
    pub day: Weekday,
    pub profiles: Vec<&'a Profile>,
}

#[derive(Debug, Clone)]
pub struct WeeklyView<'a> {
    pub total_staff: usize,
    /// Monday first.
    pub day_counts: [DayCount; 7],
    /// Busiest first, ties in Monday to Sunday order.
    pub ranked: Vec<DayCount>,
    pub average_staff_per_day: usize,
    /// Chart bars in ranked order.
    pub distribution: Vec<DayBar>,
    index: DayAvailabilityIndex<'a>,
}

impl<'a> WeeklyView<'a> {
    pub fn new(profiles: &'a [Profile]) -> Self {
        let index = DayAvailabilityIndex::new(profiles);
        let day_counts = index.day_counts();
        let ranked = index.ranked_days_by_popularity();

        let busiest = ranked.first().map(|c| c.count).unwrap_or(0);
        let distribution = ranked
            .iter()
            .map(|c| DayBar {
                day: c.day,
                count: c.count,
                percent_of_busiest: rounded_percent(c.count, busiest).unwrap_or(0),
            })
            .collect();
        let assignments: usize = day_counts.iter().map(|c| c.count).sum();

        Self {
            total_staff: profiles.len(),
            day_counts,
            ranked,
            average_staff_per_day: rounded_ratio(assignments, Weekday::ALL.len()).unwrap_or(0),
            distribution,
            index,
        }
    }

    pub fn most_popular(&self) -> DayCount {
        self.ranked[0]
    }

    pub fn least_popular(&self) -> DayCount {
        self.ranked[self.ranked.len() - 1]
    }

    pub fn count_on(&self, day: Weekday) -> usize {
        self.day_counts[day.index()].count
    }

    pub fn day_detail(&self, day: Weekday) -> DayDetail<'a> {
        DayDetail {
            day,
            profiles: self.index.profiles_on_day(day),
        }
    }
}
