//! The reserved-staff summary: searchable, day-filterable and sortable rows
//! plus aggregate statistics over the whole roster.

use super::contains_ignore_case;
use crate::availability::{DayAvailabilityIndex, DayCount};
use crate::domain::{Profile, Weekday};
use crate::stats::{rounded_percent, rounded_ratio};
use std::fmt;
use std::str::FromStr;

/// Profiles available at least this many days a week count as full-time.
pub const FULL_TIME_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Full name, A to Z.
    #[default]
    Name,
    /// Most available days first.
    Days,
    /// Gender name, A to Z; profiles without one come first.
    Gender,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Days => "days",
            SortMode::Gender => "gender",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode '{0}' (expected name, days or gender)")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortMode::Name),
            "days" => Ok(SortMode::Days),
            "gender" => Ok(SortMode::Gender),
            _ => Err(UnknownSortMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedQuery {
    /// Matched against names and email ignoring case, and against the phone
    /// number as typed.
    pub search: String,
    pub day: Option<Weekday>,
    pub sort: SortMode,
}

impl ReservedQuery {
    /// How many of the two filters (search, day) are in effect.
    pub fn active_filters(&self) -> usize {
        usize::from(!self.search.is_empty()) + usize::from(self.day.is_some())
    }

    fn admits(&self, profile: &Profile, needle_lower: &str) -> bool {
        let searched = self.search.is_empty()
            || contains_ignore_case(&profile.first_name, needle_lower)
            || contains_ignore_case(&profile.last_name, needle_lower)
            || contains_ignore_case(&profile.email, needle_lower)
            || profile.phone.contains(&self.search);
        let on_day = self
            .day
            .map_or(true, |day| profile.available_days.contains(day));
        searched && on_day
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedRow<'a> {
    /// 1-based position in the sorted result.
    pub position: usize,
    pub profile: &'a Profile,
    pub working_days: usize,
    pub week_share_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedSummary {
    pub total_profiles: usize,
    pub shown: usize,
    pub active_filters: usize,
    /// `None` for an empty roster.
    pub average_working_days: Option<usize>,
    pub most_active_day: DayCount,
    pub full_time: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedView<'a> {
    pub rows: Vec<ReservedRow<'a>>,
    pub summary: ReservedSummary,
}

/// Filters then sorts `profiles` per `query`. The summary statistics always
/// describe the whole roster, not just the rows shown.
pub fn reserved_view<'a>(profiles: &'a [Profile], query: &ReservedQuery) -> ReservedView<'a> {
    let needle = query.search.to_lowercase();
    let mut selected: Vec<&'a Profile> = profiles
        .iter()
        .filter(|profile| query.admits(profile, &needle))
        .collect();

    match query.sort {
        SortMode::Name => {
            selected.sort_by_cached_key(|profile| profile.full_name().to_lowercase())
        }
        SortMode::Days => selected.sort_by(|a, b| b.working_days().cmp(&a.working_days())),
        SortMode::Gender => {
            selected.sort_by_key(|profile| profile.gender.map(|g| g.as_str()).unwrap_or(""))
        }
    }

    let rows: Vec<ReservedRow<'a>> = selected
        .into_iter()
        .enumerate()
        .map(|(i, profile)| ReservedRow {
            position: i + 1,
            profile,
            working_days: profile.working_days(),
            week_share_percent: rounded_percent(profile.working_days(), Weekday::ALL.len())
                .unwrap_or(0),
        })
        .collect();

    let index = DayAvailabilityIndex::new(profiles);
    let summary = ReservedSummary {
        total_profiles: profiles.len(),
        shown: rows.len(),
        active_filters: query.active_filters(),
        average_working_days: rounded_ratio(index.total_assignments(), profiles.len()),
        most_active_day: index.ranked_days_by_popularity()[0],
        full_time: profiles
            .iter()
            .filter(|profile| profile.working_days() >= FULL_TIME_DAYS)
            .count(),
    };

    ReservedView { rows, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::tests::profile;
    use crate::domain::Gender;
    use crate::domain::Weekday::*;

    fn roster() -> Vec<Profile> {
        let mut zoe = profile("1", "Zoe", "Adams", &[Monday, Tuesday, Wednesday, Thursday, Friday]);
        zoe.gender = Some(Gender::Female);
        zoe.phone = "4415550199".to_string();
        let mut adam = profile("2", "adam", "Young", &[Saturday, Sunday]);
        adam.gender = Some(Gender::Male);
        let mut kim = profile("3", "Kim", "Lee", &[Monday, Saturday, Sunday]);
        kim.gender = None;
        vec![zoe, adam, kim]
    }

    fn ids(view: &ReservedView<'_>) -> Vec<String> {
        view.rows.iter().map(|row| row.profile.id.to_string()).collect()
    }

    #[test]
    fn counts_full_time_staff() {
        let profiles = vec![
            profile("1", "A", "A", &[Monday, Tuesday, Wednesday, Thursday, Friday]),
            profile("2", "B", "B", &[Monday, Tuesday]),
        ];
        let view = reserved_view(&profiles, &ReservedQuery::default());
        assert_eq!(view.summary.full_time, 1);
        // 7 days over 2 profiles rounds half up.
        assert_eq!(view.summary.average_working_days, Some(4));
        assert_eq!(view.summary.most_active_day, DayCount { day: Monday, count: 2 });
    }

    #[test]
    fn sort_modes() {
        let profiles = roster();
        let by = |sort: SortMode| {
            let query = ReservedQuery {
                sort,
                ..ReservedQuery::default()
            };
            ids(&reserved_view(&profiles, &query))
        };
        assert_eq!(by(SortMode::Name), vec!["2", "3", "1"]);
        assert_eq!(by(SortMode::Days), vec!["1", "3", "2"]);
        assert_eq!(by(SortMode::Gender), vec!["3", "1", "2"]);
    }

    #[test]
    fn search_covers_phone_and_composes_with_day_filter() {
        let profiles = roster();
        let phone = ReservedQuery {
            search: "4415".to_string(),
            ..ReservedQuery::default()
        };
        assert_eq!(ids(&reserved_view(&profiles, &phone)), vec!["1"]);

        let combined = ReservedQuery {
            search: "ADAM".to_string(),
            day: Some(Sunday),
            sort: SortMode::Days,
        };
        let view = reserved_view(&profiles, &combined);
        // Zoe Adams matches the search but not the day.
        assert_eq!(ids(&view), vec!["2"]);
        assert_eq!(view.summary.shown, 1);
        assert_eq!(view.summary.total_profiles, 3);
        assert_eq!(view.summary.active_filters, 2);
    }

    #[test]
    fn rows_carry_position_and_share_of_week() {
        let profiles = roster();
        let view = reserved_view(&profiles, &ReservedQuery::default());
        let first = &view.rows[0];
        assert_eq!(first.position, 1);
        assert_eq!(first.working_days, 2);
        assert_eq!(first.week_share_percent, 29);
        assert_eq!(view.rows[2].week_share_percent, 71);
    }

    #[test]
    fn empty_roster_has_no_average() {
        let view = reserved_view(&[], &ReservedQuery::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.summary.average_working_days, None);
        assert_eq!(view.summary.full_time, 0);
        assert_eq!(view.summary.most_active_day, DayCount { day: Monday, count: 0 });
    }

    #[test]
    fn sort_mode_round_trips_through_its_name() {
        for mode in [SortMode::Name, SortMode::Days, SortMode::Gender] {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
        assert!("age".parse::<SortMode>().is_err());
    }
}
