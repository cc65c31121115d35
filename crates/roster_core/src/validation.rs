//! crates/roster_core/src/validation.rs
//!
//! Client-side validation of profile drafts. Every rule here runs before a
//! request is sent, so a rejected draft never reaches the backend.

use crate::domain::{DaySet, ProfileDraft, UnknownDay};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Minimum number of digits in a usable phone number.
pub const MIN_PHONE_DIGITS: usize = 7;

/// A draft field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Photo,
    FirstName,
    LastName,
    Email,
    Phone,
    Gender,
    AvailableDays,
}

impl Field {
    /// The wire name of the field, as used in the multipart form.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Photo => "photo",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Gender => "gender",
            Field::AvailableDays => "availableDays",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All the field errors found in one draft, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The message recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field.as_str(), error.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<UnknownDay> for ValidationErrors {
    fn from(err: UnknownDay) -> Self {
        ValidationErrors::single(Field::AvailableDays, err.to_string())
    }
}

/// Whether a draft is about to be created or is replacing an existing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPurpose {
    Create,
    Update,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Phone numbers may carry the usual formatting characters; what counts is
/// that everything else is a digit and there are enough of them.
pub fn is_valid_phone(phone: &str) -> bool {
    let mut digits = 0;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | '(' | ')' | '.' | ' ' => {}
            _ => return false,
        }
    }
    digits >= MIN_PHONE_DIGITS
}

/// Parses user-supplied day names into a set. Any name outside the
/// Monday..Sunday domain is rejected.
pub fn parse_days<I, S>(names: I) -> Result<DaySet, ValidationErrors>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(DaySet::parse(names)?)
}

/// Checks every rule on `draft`, collecting one message per failing field.
pub fn validate_draft(draft: &ProfileDraft, purpose: DraftPurpose) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if purpose == DraftPurpose::Create && draft.photo.is_none() {
        errors.push(Field::Photo, "Photo is required");
    }
    if let Some(photo) = &draft.photo {
        if photo.bytes.is_empty() {
            errors.push(Field::Photo, "Photo file is empty");
        }
    }
    if draft.first_name.trim().is_empty() {
        errors.push(Field::FirstName, "First name is required");
    }
    if draft.last_name.trim().is_empty() {
        errors.push(Field::LastName, "Last name is required");
    }
    if draft.email.trim().is_empty() {
        errors.push(Field::Email, "Email is required");
    } else if !is_valid_email(&draft.email) {
        errors.push(Field::Email, "Invalid email address");
    }
    if !is_valid_phone(&draft.phone) {
        errors.push(Field::Phone, "Valid phone number is required");
    }
    if draft.gender.is_none() {
        errors.push(Field::Gender, "Gender is required");
    }
    if draft.available_days.is_empty() {
        errors.push(Field::AvailableDays, "Select at least one available day");
    }

    errors.into_result()
}
