/// Core types used throughout the domain layer
///
/// This module defines the identifier, status and completion-date types that
/// the Habit record and the lifecycle engine are built from.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Format of every calendar-date string we persist or accept
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a habit
///
/// Identifiers are opaque strings. New habits get a random UUID, but records
/// loaded from older data keep whatever id they were stored with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HabitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where a habit sits in its lifecycle
///
/// Habits start out `Active`. `Completed` and `Archived` are terminal: once a
/// habit reaches either one, nothing moves it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    /// Being worked on
    Active,
    /// Target reached and confirmed by the user
    Completed,
    /// Put away by the user
    Archived,
}

impl HabitStatus {
    /// Wire name, as stored in the `status` field
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Completed => "completed",
            HabitStatus::Archived => "archived",
        }
    }

    /// Label shown to users next to a habit
    pub fn display_name(&self) -> &'static str {
        match self {
            HabitStatus::Active => "In Progress",
            HabitStatus::Completed => "Completed",
            HabitStatus::Archived => "Archived",
        }
    }

    /// Whether a habit in this state may move to `next`
    ///
    /// Only active habits change state. Re-applying the current state is
    /// always allowed so repeated requests stay harmless.
    pub fn can_transition_to(&self, next: HabitStatus) -> bool {
        *self == next || *self == HabitStatus::Active
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(HabitStatus::Active),
            "completed" => Ok(HabitStatus::Completed),
            "archived" => Ok(HabitStatus::Archived),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid status '{}'. Valid options: active, completed, archived",
                    other
                ),
            }),
        }
    }
}

/// The set of calendar days on which a habit was done
///
/// Behaves as a set (no duplicates, membership is what matters) but keeps
/// insertion order so the history reads naturally when displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionDates(Vec<NaiveDate>);

impl CompletionDates {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    /// Add a date; returns false if it was already present
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        if self.contains(date) {
            return false;
        }
        self.0.push(date);
        true
    }

    /// Remove a date; returns false if it was not present
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        let before = self.0.len();
        self.0.retain(|d| *d != date);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }

    /// Drop repeated dates, keeping the first occurrence of each
    ///
    /// Returns how many duplicates were removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.0.len();
        let mut seen = Vec::with_capacity(before);
        self.0.retain(|d| {
            if seen.contains(d) {
                false
            } else {
                seen.push(*d);
                true
            }
        });
        before - self.0.len()
    }
}

impl FromIterator<NaiveDate> for CompletionDates {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let mut dates = Self::new();
        for date in iter {
            dates.insert(date);
        }
        dates
    }
}

/// Today's calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}
