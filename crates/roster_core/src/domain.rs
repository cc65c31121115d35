//! crates/roster_core/src/domain.rs
//!
//! Defines the pure, core data structures for the roster: staff profiles,
//! the fixed weekday domain and the drafts submitted when creating or
//! editing a profile.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Weekdays
//=========================================================================================

/// A day of the working week. Declaration order is the canonical display
/// order, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Every day of the week in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label used in compact listings ("Mon", "Tue", ...).
    pub fn short(self) -> &'static str {
        &self.as_str()[..3]
    }

    /// Zero-based position in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a string is not one of the seven canonical day names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a day of the week")]
pub struct UnknownDay(pub String);

impl FromStr for Weekday {
    type Err = UnknownDay;

    /// Only the exact canonical names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

//=========================================================================================
// DaySet
//=========================================================================================

/// A set of weekdays. Iteration always yields days in canonical order, no
/// matter the order they were inserted in.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        DaySet(0)
    }

    /// Parses a list of day names, rejecting anything outside the domain.
    pub fn parse<I, S>(names: I) -> Result<Self, UnknownDay>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<Weekday>())
            .collect()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    /// Adds `day`; returns `false` if it was already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let added = !self.contains(day);
        self.0 |= day.bit();
        added
    }

    /// Adds `day` if absent, removes it otherwise.
    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= day.bit();
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> {
        let bits = self.0;
        Weekday::ALL
            .into_iter()
            .filter(move |day| bits & day.bit() != 0)
    }

    pub fn intersection(&self, other: &DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }

    pub fn difference(&self, other: &DaySet) -> DaySet {
        DaySet(self.0 & !other.0)
    }

    pub fn intersects(&self, other: &DaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_superset(&self, other: &DaySet) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Weekday::as_str).collect();
        f.pad(&names.join(", "))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl<const N: usize> From<[Weekday; N]> for DaySet {
    fn from(days: [Weekday; N]) -> Self {
        days.into_iter().collect()
    }
}

impl From<Vec<Weekday>> for DaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<DaySet> for Vec<Weekday> {
    fn from(set: DaySet) -> Self {
        set.iter().collect()
    }
}

//=========================================================================================
// Scalar Value Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognised gender (expected Male, Female or Other)")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// The opaque, server-assigned identifier of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        ProfileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The filename under which the backend stores a profile's photo. It is
/// served back from `/uploads/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(filename: impl Into<String>) -> Self {
        PhotoRef(filename.into())
    }

    pub fn filename(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhotoRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PhotoRef::new(s))
    }
}

/// A photo picked locally for upload that the server has not stored yet.
/// It only becomes a [`PhotoRef`] once a create or update succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PendingPhoto {
    /// Builds a pending photo, inferring the content type from the extension.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

//=========================================================================================
// Profile
//=========================================================================================

/// A staff member's record as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoRef>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub kin1: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub kin2: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "null_as_empty_days")]
    pub available_days: DaySet,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Number of days this person is available in a week.
    pub fn working_days(&self) -> usize {
        self.available_days.len()
    }
}

/// The backend sends empty strings for unset optional fields.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn null_as_empty_days<'de, D>(deserializer: D) -> Result<DaySet, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DaySet>::deserialize(deserializer)?.unwrap_or_default())
}

//=========================================================================================
// ProfileDraft
//=========================================================================================

/// The full set of mutable fields submitted by a create or an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub kin1: Option<String>,
    pub kin2: Option<String>,
    pub gender: Option<Gender>,
    pub available_days: DaySet,
    /// A new photo to upload. Required on create, optional on update.
    pub photo: Option<PendingPhoto>,
}

impl From<&Profile> for ProfileDraft {
    /// Pre-fills a draft from an existing profile; the stored photo is kept
    /// server-side unless a new one is attached.
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            kin1: profile.kin1.clone(),
            kin2: profile.kin2.clone(),
            gender: profile.gender,
            available_days: profile.available_days,
            photo: None,
        }
    }
}
