//! crates/roster_core/src/projectors/mod.rs
//!
//! Pure functions turning a snapshot into display-ready aggregates. None of
//! them hold state: they are recomputed whenever the snapshot or a filter
//! parameter changes.

pub mod list;
pub mod reserved;
pub mod weekly;

pub use list::list_rows;
pub use reserved::{
    reserved_view, ReservedQuery, ReservedRow, ReservedSummary, ReservedView, SortMode,
    UnknownSortMode, FULL_TIME_DAYS,
};
pub use weekly::{DayBar, DayDetail, WeeklyView};

/// Case-insensitive substring test. An empty needle matches everything.
fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}
