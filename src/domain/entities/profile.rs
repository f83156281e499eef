//! Profile entity and the typed set of fields a write touches.
//!
//! Inbound profiles follow a "zero value means unset" convention: an empty
//! string or a zero id is treated as "do not change". As a consequence a
//! field can never be cleared back to empty through an update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Calendar format birthdays are exchanged in.
pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// A user profile.
///
/// The serialized field names are part of the cache format and must stay
/// stable across versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub birthday: String,
    pub email: String,
    pub avatar_url: String,
}

impl Profile {
    /// Formats a stored date the way profiles exchange it.
    pub fn format_birthday(date: Option<NaiveDate>) -> String {
        date.map(|d| d.format(BIRTHDAY_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Parses an inbound birthday.
///
/// Malformed input never fails the write: it is replaced by 1970-01-01 and
/// logged as a data-quality warning.
pub fn parse_birthday(raw: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(raw, BIRTHDAY_FORMAT) {
        Ok(date) => date,
        Err(e) => {
            warn!(birthday = raw, error = %e, "Unparseable birthday, using default date");
            NaiveDate::default()
        }
    }
}

/// A single present profile column together with its typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileField {
    Id(i64),
    UserId(i64),
    Username(String),
    Birthday(NaiveDate),
    Email(String),
    AvatarUrl(String),
}

impl ProfileField {
    /// Column name in the profile table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::UserId(_) => "user_id",
            Self::Username(_) => "username",
            Self::Birthday(_) => "birthday",
            Self::Email(_) => "email",
            Self::AvatarUrl(_) => "avatar_url",
        }
    }
}

/// Ordered set of present fields derived from a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    fields: Vec<ProfileField>,
}

impl ProfileChanges {
    /// Fields written when inserting a profile, keys included.
    pub fn for_insert(profile: &Profile) -> Self {
        let mut fields = Vec::new();
        if profile.id != 0 {
            fields.push(ProfileField::Id(profile.id));
        }
        if profile.user_id != 0 {
            fields.push(ProfileField::UserId(profile.user_id));
        }
        let mut changes = Self { fields };
        changes.push_attributes(profile);
        changes
    }

    /// Fields written by a partial update. The row keys are never rewritten.
    pub fn for_update(patch: &Profile) -> Self {
        let mut changes = Self::default();
        changes.push_attributes(patch);
        changes
    }

    fn push_attributes(&mut self, profile: &Profile) {
        if !profile.username.is_empty() {
            self.fields
                .push(ProfileField::Username(profile.username.clone()));
        }
        if !profile.birthday.is_empty() {
            self.fields
                .push(ProfileField::Birthday(parse_birthday(&profile.birthday)));
        }
        if !profile.email.is_empty() {
            self.fields.push(ProfileField::Email(profile.email.clone()));
        }
        if !profile.avatar_url.is_empty() {
            self.fields
                .push(ProfileField::AvatarUrl(profile.avatar_url.clone()));
        }
    }

    pub fn fields(&self) -> &[ProfileField] {
        &self.fields
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(ProfileField::column).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
