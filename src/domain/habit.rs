/// Habit entity and related functionality
///
/// This module defines the Habit record that is persisted in the habit slot,
/// the form data used to create one, and the predefined starter habits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{CompletionDates, DomainError, HabitId, HabitStatus};

/// Number of days a habit targets when none is given
///
/// It typically takes 21 days to form a habit.
pub const DEFAULT_TARGET: u32 = 21;

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A habit the user is building
///
/// This is the only persisted entity. Field names follow the stored JSON
/// layout (`completedDates`, `isCompleted`, ...).
///
/// `is_completed` duplicates `status == Completed`; it is stored separately
/// and kept in sync by every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, immutable once assigned
    pub id: HabitId,
    /// Display title (never empty)
    pub title: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle state
    pub status: HabitStatus,
    /// When the habit was created
    pub created_at: DateTime<Utc>,
    /// Days the habit was done on
    #[serde(default)]
    pub completed_dates: CompletionDates,
    /// Mirror of `status == Completed`
    pub is_completed: bool,
    /// Distinct completed days needed to consider the habit formed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Stored fields this version does not know about, written back as found
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for creating a habit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub target: Option<u32>,
}

impl Habit {
    /// Create a new active habit from form data
    ///
    /// The title and description are trimmed; a blank description is dropped
    /// and a missing target falls back to [`DEFAULT_TARGET`]. Nothing is
    /// constructed if validation fails.
    pub fn create(input: NewHabit) -> Result<Self, DomainError> {
        let title = input.title.trim().to_string();
        Self::validate_title(&title)?;

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self::validate_description(&description)?;

        let target = input.target.unwrap_or(DEFAULT_TARGET);
        if target == 0 {
            return Err(DomainError::InvalidValue {
                message: "Target must be at least 1 day".to_string(),
            });
        }

        Ok(Self {
            id: HabitId::new(),
            title,
            description,
            status: HabitStatus::Active,
            created_at: Utc::now(),
            completed_dates: CompletionDates::new(),
            is_completed: false,
            target: Some(target),
            extra: Map::new(),
        })
    }

    /// Whether the habit was done on `date`
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(date)
    }

    /// Number of distinct days the habit was done
    pub fn completed_count(&self) -> usize {
        self.completed_dates.len()
    }

    /// Whether enough days are logged to meet the target
    ///
    /// Always false for habits without a target.
    pub fn target_reached(&self) -> bool {
        match self.target {
            Some(target) => self.completed_count() >= target as usize,
            None => false,
        }
    }

    /// Progress caption, e.g. "7 / 21 days"
    pub fn target_display(&self) -> Option<String> {
        self.target
            .map(|target| format!("{} / {} days", self.completed_count(), target))
    }

    /// Count caption, e.g. "1 day" or "12 days"
    pub fn completed_days_display(&self) -> String {
        let count = self.completed_count();
        format!("{} {}", count, if count == 1 { "day" } else { "days" })
    }

    /// Restore the record invariants in place
    ///
    /// Re-derives `is_completed` from `status`, drops duplicate dates and
    /// clears a zero target. Returns true if anything changed.
    pub fn enforce_invariants(&mut self) -> bool {
        let mut changed = false;

        let expected = self.status == HabitStatus::Completed;
        if self.is_completed != expected {
            self.is_completed = expected;
            changed = true;
        }

        if self.completed_dates.dedup() > 0 {
            changed = true;
        }

        if self.target == Some(0) {
            self.target = None;
            changed = true;
        }

        changed
    }

    // Validation helper methods

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidTitle(format!(
                "Habit title cannot be longer than {} characters",
                MAX_TITLE_LEN
            )));
        }

        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation {
                    message: format!(
                        "Description cannot be longer than {} characters",
                        MAX_DESCRIPTION_LEN
                    ),
                });
            }
        }
        Ok(())
    }
}

/// A ready-made habit users can start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub target: u32,
}

impl HabitTemplate {
    /// Form data prefilled from this template
    pub fn to_new_habit(&self) -> NewHabit {
        NewHabit {
            title: self.title.to_string(),
            description: Some(self.description.to_string()),
            target: Some(self.target),
        }
    }
}

/// Starter habits offered on the create form
pub const PREDEFINED_HABITS: &[HabitTemplate] = &[
    HabitTemplate { title: "Drink water", description: "8 glasses per day", target: 30 },
    HabitTemplate { title: "Exercise", description: "30 minutes daily", target: 30 },
    HabitTemplate { title: "Read", description: "15 minutes before bed", target: 21 },
    HabitTemplate { title: "Meditate", description: "5 minutes in the morning", target: 21 },
];

/// Look up a predefined habit by title (case-insensitive)
pub fn find_template(title: &str) -> Option<&'static HabitTemplate> {
    let wanted = title.trim().to_lowercase();
    PREDEFINED_HABITS
        .iter()
        .find(|t| t.title.to_lowercase() == wanted)
}
