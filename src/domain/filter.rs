/// Status filters and per-status counts for habit lists

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Habit, HabitStatus};

/// Which habits a list view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Archived,
}

impl StatusFilter {
    pub fn matches(&self, habit: &Habit) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => habit.status == HabitStatus::Active,
            StatusFilter::Completed => habit.status == HabitStatus::Completed,
            StatusFilter::Archived => habit.status == HabitStatus::Archived,
        }
    }

    /// Keep the habits this filter matches, in their original order
    pub fn apply<'a>(&self, habits: &'a [Habit]) -> Vec<&'a Habit> {
        habits.iter().filter(|h| self.matches(h)).collect()
    }

    /// One-line explanation shown above a filtered list
    pub fn description(&self) -> &'static str {
        match self {
            StatusFilter::All => "Showing all your habits",
            StatusFilter::Active => "Habits you're currently working on",
            StatusFilter::Completed => "Habits you've successfully formed",
            StatusFilter::Archived => "Habits you've put aside",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            "archived" => Ok(StatusFilter::Archived),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid filter '{}'. Valid options: all, active, completed, archived",
                    other
                ),
            }),
        }
    }
}

/// Number of habits in each status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
    pub archived: usize,
}

impl StatusCounts {
    pub fn from_habits(habits: &[Habit]) -> Self {
        habits.iter().fold(Self::default(), |mut counts, habit| {
            counts.all += 1;
            match habit.status {
                HabitStatus::Active => counts.active += 1,
                HabitStatus::Completed => counts.completed += 1,
                HabitStatus::Archived => counts.archived += 1,
            }
            counts
        })
    }

    /// Count for the habits a filter would show
    pub fn for_filter(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Active => self.active,
            StatusFilter::Completed => self.completed,
            StatusFilter::Archived => self.archived,
        }
    }
}
