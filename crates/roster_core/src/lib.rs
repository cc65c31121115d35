pub mod availability;
pub mod domain;
pub mod matcher;
pub mod ports;
pub mod projectors;
pub mod stats;
pub mod store;
pub mod validation;

pub use availability::{DayAvailabilityIndex, DayCount};
pub use domain::{
    DaySet, Gender, PendingPhoto, PhotoRef, Profile, ProfileDraft, ProfileId, UnknownDay,
    UnknownGender, Weekday,
};
pub use matcher::{match_schedule, MatchReport, MatchSummary, ScheduleMatch, ScheduleMatcher};
pub use ports::{PhotoRepository, PortError, PortResult, ProfileRepository};
pub use projectors::{ReservedQuery, ReservedView, SortMode, WeeklyView};
pub use store::{ProfileStore, Snapshot, StoreOptions, StoreState};
pub use validation::{validate_draft, DraftPurpose, Field, ValidationErrors};
