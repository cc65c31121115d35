//! services/console/src/render.rs
//!
//! Plain-text rendering of the core's view projections. Every function
//! returns a `String` so commands stay testable without a terminal.

use roster_core::domain::{DaySet, Profile, Weekday};
use roster_core::matcher::MatchReport;
use roster_core::projectors::{DayDetail, ReservedQuery, ReservedView, WeeklyView};
use roster_core::validation::ValidationErrors;
use std::fmt::Write;

/// How many names a day card lists before collapsing into "+N more".
const DAY_CARD_PREVIEW: usize = 3;
const BAR_WIDTH: u32 = 30;

fn gender_label(profile: &Profile) -> &'static str {
    profile.gender.map(|g| g.as_str()).unwrap_or("-")
}

fn short_days(days: &DaySet) -> String {
    if days.is_empty() {
        return "No days".to_string();
    }
    days.iter().map(Weekday::short).collect::<Vec<_>>().join(" ")
}

/// The whole week with unavailable days dashed out and `highlight` starred.
fn week_strip(days: &DaySet, highlight: Option<Weekday>) -> String {
    Weekday::ALL
        .iter()
        .map(|&day| match (days.contains(day), highlight == Some(day)) {
            (true, true) => format!("*{}*", day.short()),
            (true, false) => day.short().to_string(),
            (false, _) => "---".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn profile_table(rows: &[&Profile]) -> String {
    if rows.is_empty() {
        return "No profiles found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}{:<24}{:<32}{:<16}{:<8}{}",
        "#", "NAME", "EMAIL", "PHONE", "GENDER", "DAYS"
    );
    for (i, profile) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<24}{:<32}{:<16}{:<8}{}",
            i + 1,
            profile.full_name(),
            profile.email,
            profile.phone,
            gender_label(profile),
            short_days(&profile.available_days)
        );
    }
    out
}

pub fn profile_detail(profile: &Profile, photo_url: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", profile.full_name(), profile.id);
    let _ = writeln!(out, "  Email:    {}", profile.email);
    let _ = writeln!(out, "  Phone:    {}", profile.phone);
    let _ = writeln!(out, "  Gender:   {}", gender_label(profile));
    let _ = writeln!(out, "  Photo:    {}", photo_url.unwrap_or("No Photo"));
    let _ = writeln!(out, "  Kin 1:    {}", profile.kin1.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "  Kin 2:    {}", profile.kin2.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "  Schedule: {}", week_strip(&profile.available_days, None));
    out
}

pub fn weekly(view: &WeeklyView<'_>, detail: Option<&DayDetail<'_>>) -> String {
    let mut out = String::new();
    let most = view.most_popular();
    let least = view.least_popular();
    let _ = writeln!(out, "Schedule Summary");
    let _ = writeln!(out, "  Total staff:       {}", view.total_staff);
    let _ = writeln!(out, "  Most popular day:  {} ({})", most.day, most.count);
    let _ = writeln!(out, "  Least popular day: {} ({})", least.day, least.count);
    let _ = writeln!(out, "  Avg staff/day:     {}", view.average_staff_per_day);
    out.push('\n');

    match detail {
        None => {
            for count in &view.day_counts {
                let profiles = view.day_detail(count.day).profiles;
                let _ = write!(out, "{:<10} {:>3}  ", count.day, count.count);
                if profiles.is_empty() {
                    out.push_str("No staff");
                } else {
                    let names: Vec<String> = profiles
                        .iter()
                        .take(DAY_CARD_PREVIEW)
                        .map(|p| p.full_name())
                        .collect();
                    out.push_str(&names.join(", "));
                    if profiles.len() > DAY_CARD_PREVIEW {
                        let _ = write!(out, " +{} more", profiles.len() - DAY_CARD_PREVIEW);
                    }
                }
                out.push('\n');
            }
        }
        Some(detail) => {
            let _ = writeln!(out, "{} - Staff Schedule", detail.day);
            if detail.profiles.is_empty() {
                out.push_str("  No staff\n");
            }
            for profile in &detail.profiles {
                let _ = writeln!(
                    out,
                    "  {:<24}{:<8}{}  kin: {} / {}",
                    profile.full_name(),
                    gender_label(profile),
                    week_strip(&profile.available_days, Some(detail.day)),
                    profile.kin1.as_deref().unwrap_or("N/A"),
                    profile.kin2.as_deref().unwrap_or("N/A"),
                );
            }
        }
    }

    out.push('\n');
    let _ = writeln!(out, "Staff Distribution by Day");
    for bar in &view.distribution {
        let width = (bar.percent_of_busiest * BAR_WIDTH + 50) / 100;
        let _ = writeln!(
            out,
            "  {:<10}|{:<30}| {}",
            bar.day,
            "#".repeat(width as usize),
            bar.count
        );
    }
    out
}

pub fn schedule_matches(report: &MatchReport<'_>) -> String {
    let mut out = String::new();
    if report.selected.is_empty() {
        out.push_str("Select days to find colleagues.\n");
        return out;
    }
    let total = report.matches.len();
    let _ = writeln!(
        out,
        "Found {} colleague{} (matching: {})",
        total,
        if total == 1 { "" } else { "s" },
        report.selected
    );
    if total == 0 {
        out.push_str("No colleagues found working on the selected days.\n");
        return out;
    }

    for m in &report.matches {
        let _ = writeln!(
            out,
            "  {:>3}%  {:<24}({})",
            m.match_percent,
            m.profile.full_name(),
            gender_label(m.profile)
        );
        let _ = writeln!(
            out,
            "        Matching days ({}): {}",
            m.matching_days.len(),
            m.matching_days
        );
        if !m.extra_days.is_empty() {
            let _ = writeln!(out, "        Also works on: {}", m.extra_days);
        }
    }

    let summary = &report.summary;
    out.push('\n');
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  Total found:     {}", summary.total);
    let _ = writeln!(out, "  Perfect matches: {}", summary.perfect);
    let _ = writeln!(out, "  Partial matches: {}", summary.partial);
    if let Some(average) = summary.average_match_percent {
        let _ = writeln!(out, "  Avg match:       {}%", average);
    }
    out
}

pub fn reserved(view: &ReservedView<'_>, query: &ReservedQuery) -> String {
    let mut out = String::new();
    let summary = &view.summary;
    let _ = write!(
        out,
        "Showing {} of {} profiles",
        summary.shown, summary.total_profiles
    );
    if !query.search.is_empty() {
        let _ = write!(out, " matching \"{}\"", query.search);
    }
    if let Some(day) = query.day {
        let _ = write!(out, " working on {}", day);
    }
    let _ = writeln!(out, " (sorted by {}, {} active filters)", query.sort, summary.active_filters);

    if view.rows.is_empty() {
        out.push_str("No profiles found. Try adjusting your search or filter criteria.\n");
    }
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  #{:<3} {:<24}{:<8}{:<28}{} days ({}% of week)",
            row.position,
            row.profile.full_name(),
            gender_label(row.profile),
            short_days(&row.profile.available_days),
            row.working_days,
            row.week_share_percent
        );
    }

    if summary.total_profiles > 0 {
        out.push('\n');
        let _ = writeln!(out, "Statistics");
        let _ = writeln!(out, "  Total profiles:       {}", summary.total_profiles);
        if let Some(average) = summary.average_working_days {
            let _ = writeln!(out, "  Average working days: {}", average);
        }
        let _ = writeln!(
            out,
            "  Most active day:      {} ({})",
            summary.most_active_day.day, summary.most_active_day.count
        );
        let _ = writeln!(out, "  Full-time staff:      {}", summary.full_time);
    }
    out
}

/// One line per rejected field, in field order.
pub fn validation_errors(errors: &ValidationErrors) -> String {
    let mut out = String::new();
    for error in errors.iter() {
        let _ = writeln!(out, "  {}: {}", error.field.as_str(), error.message);
    }
    out
}
