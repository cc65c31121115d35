//! services/console/src/cli.rs
//!
//! The `roster` command tree and the handlers behind each command. Every
//! read command loads a fresh snapshot and renders one view projection;
//! write commands go through the profile store so they are validated first
//! and followed by a reload.

use crate::context::AppContext;
use crate::error::ConsoleError;
use crate::render;
use clap::{Args, Parser, Subcommand};
use roster_core::domain::{DaySet, Gender, PendingPhoto, Profile, ProfileDraft, ProfileId, Weekday};
use roster_core::ports::PortError;
use roster_core::projectors::{ReservedQuery, SortMode};
use roster_core::store::Snapshot;
use roster_core::validation::{parse_days, ValidationErrors};
use std::path::{Path, PathBuf};
use tracing::info;

//=========================================================================================
// Command Definitions
//=========================================================================================

/// Manage staff profiles and explore weekly availability.
#[derive(Parser, Debug)]
#[command(name = "roster", version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the profiles backend (overrides ROSTER_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List profiles, optionally filtered by name or email
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show one profile in full
    Show {
        id: String,
        /// Print the raw profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Weekly headcounts, or the staff working on one day
    Weekly {
        #[arg(short, long, value_parser = parse_weekday)]
        day: Option<Weekday>,
    },
    /// Find colleagues available on the given days
    Match { days: Vec<String> },
    /// Filtered, sorted staff listing with roster statistics
    Reserved {
        /// Matches names, email or phone
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, value_parser = parse_weekday)]
        day: Option<Weekday>,
        /// name, days or gender
        #[arg(long, default_value = "name", value_parser = parse_sort)]
        sort: SortMode,
    },
    /// Create a profile (a photo is required)
    Create(ProfileFields),
    /// Replace a profile's fields; omitted flags keep their current values
    Update {
        id: String,
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Delete a profile
    Delete { id: String },
    /// Download a profile's photo
    Photo {
        id: String,
        #[arg(short, long)]
        out: PathBuf,
    },
}

/// Profile fields shared by `create` and `update`. Nothing is required at
/// the flag level so the store's validation can report every missing field.
#[derive(Args, Debug, Default, Clone)]
pub struct ProfileFields {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// First next of kin (pass an empty string to clear)
    #[arg(long)]
    pub kin1: Option<String>,
    /// Second next of kin (pass an empty string to clear)
    #[arg(long)]
    pub kin2: Option<String>,
    #[arg(long, value_parser = parse_gender)]
    pub gender: Option<Gender>,
    /// Available day; repeat for several. Replaces the whole week on update.
    #[arg(long = "day")]
    pub days: Vec<String>,
    /// Image file to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl ProfileFields {
    /// Overlays the flags that were given onto `draft`. Unknown day names are
    /// reported against the `availableDays` field.
    pub fn apply_to(&self, draft: &mut ProfileDraft) -> Result<(), ValidationErrors> {
        if let Some(first_name) = &self.first_name {
            draft.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            draft.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            draft.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            draft.phone = phone.clone();
        }
        if let Some(kin1) = &self.kin1 {
            draft.kin1 = non_blank(kin1);
        }
        if let Some(kin2) = &self.kin2 {
            draft.kin2 = non_blank(kin2);
        }
        if self.gender.is_some() {
            draft.gender = self.gender;
        }
        if !self.days.is_empty() {
            draft.available_days = day_set(&self.days)?;
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Capitalizes the input before the strict day-name parse, so `monday` and
/// `MONDAY` work on the command line.
fn capitalize(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Day names from the command line, checked against the week.
fn day_set(names: &[String]) -> Result<DaySet, ValidationErrors> {
    parse_days(names.iter().map(|name| capitalize(name)))
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    capitalize(value).parse().map_err(|e: roster_core::UnknownDay| e.to_string())
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    capitalize(value).parse().map_err(|e: roster_core::UnknownGender| e.to_string())
}

fn parse_sort(value: &str) -> Result<SortMode, String> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|e: roster_core::projectors::UnknownSortMode| e.to_string())
}

//=========================================================================================
// Command Handlers
//=========================================================================================

/// Runs one command and returns what should be printed on stdout.
pub async fn execute(command: Command, ctx: &AppContext) -> Result<String, ConsoleError> {
    match command {
        Command::List { search } => {
            let snapshot = ctx.store.load().await?;
            Ok(render::profile_table(&snapshot.list(&search)))
        }
        Command::Show { id, json } => {
            let snapshot = ctx.store.load().await?;
            let profile = find(&snapshot, &ProfileId::new(id))?;
            if json {
                return Ok(format!("{}\n", serde_json::to_string_pretty(profile)?));
            }
            let photo_url = match &profile.photo {
                Some(photo) => Some(ctx.photos.photo_url(photo)?),
                None => None,
            };
            Ok(render::profile_detail(profile, photo_url.as_deref()))
        }
        Command::Weekly { day } => {
            let snapshot = ctx.store.load().await?;
            let view = snapshot.weekly();
            let detail = day.map(|day| view.day_detail(day));
            Ok(render::weekly(&view, detail.as_ref()))
        }
        Command::Match { days } => {
            let selected = day_set(&days).map_err(PortError::from)?;
            let snapshot = ctx.store.load().await?;
            let report = snapshot.match_days(selected);
            Ok(render::schedule_matches(&report))
        }
        Command::Reserved { search, day, sort } => {
            let snapshot = ctx.store.load().await?;
            let query = ReservedQuery { search, day, sort };
            let view = snapshot.reserved(&query);
            Ok(render::reserved(&view, &query))
        }
        Command::Create(fields) => {
            let mut draft = ProfileDraft::default();
            fields.apply_to(&mut draft).map_err(PortError::from)?;
            draft.photo = load_photo(fields.photo.as_deref()).await?;
            let created = ctx.store.create(&draft).await?;
            info!(id = %created.id, "Created profile from the command line");
            Ok(format!("Profile saved: {} ({})\n", created.full_name(), created.id))
        }
        Command::Update { id, fields } => {
            let id = ProfileId::new(id);
            let snapshot = ctx.store.load().await?;
            let mut draft = ProfileDraft::from(find(&snapshot, &id)?);
            fields.apply_to(&mut draft).map_err(PortError::from)?;
            draft.photo = load_photo(fields.photo.as_deref()).await?;
            let updated = ctx.store.update(&id, &draft).await?;
            Ok(format!("Profile updated: {} ({})\n", updated.full_name(), updated.id))
        }
        Command::Delete { id } => {
            let id = ProfileId::new(id);
            ctx.store.remove(&id).await?;
            Ok(format!("Profile {} deleted\n", id))
        }
        Command::Photo { id, out } => {
            let snapshot = ctx.store.load().await?;
            let profile = find(&snapshot, &ProfileId::new(id))?;
            let photo = profile.photo.as_ref().ok_or_else(|| {
                ConsoleError::Input(format!("Profile {} has no photo", profile.id))
            })?;
            let bytes = ctx.photos.fetch_photo(photo).await?;
            tokio::fs::write(&out, &bytes).await?;
            Ok(format!("Saved {} bytes to {}\n", bytes.len(), out.display()))
        }
    }
}

fn find<'a>(snapshot: &'a Snapshot, id: &ProfileId) -> Result<&'a Profile, ConsoleError> {
    snapshot
        .find(id)
        .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", id)).into())
}

/// Reads a local image into a pending upload.
async fn load_photo(path: Option<&Path>) -> Result<Option<PendingPhoto>, ConsoleError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ConsoleError::Input(format!("{} is not a file", path.display())))?;
    Ok(Some(PendingPhoto::new(file_name, bytes)))
}
