/// MCP tools for habit management
///
/// Each tool is one action a user can take on their habits. Tools read and
/// write through the habit store and apply the lifecycle engine in between.

pub mod actions;
pub mod create;
pub mod list;
pub mod toggle;
pub mod week;

// Re-export tool functions for easy access
pub use actions::*;
pub use create::*;
pub use list::*;
pub use toggle::*;
pub use week::*;

use thiserror::Error;

use crate::domain::{DomainError, Habit, HabitId, HabitStatus};
use crate::storage::{HabitStore, KeyValueStore, StorageError};

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Habit {habit_id} is {from} and cannot become {to}")]
    Rejected {
        habit_id: String,
        from: HabitStatus,
        to: HabitStatus,
    },
}

/// Parse a habit id argument, rejecting blanks
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation {
            message: "Habit ID cannot be empty".to_string(),
        }
        .into());
    }
    Ok(HabitId::from(trimmed))
}

/// Fetch a habit, telling a missing habit apart from a failed read
pub(crate) fn find_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    habit_id: &HabitId,
) -> Result<Habit, ToolError> {
    store.try_get(habit_id)?.ok_or_else(|| ToolError::HabitNotFound {
        habit_id: habit_id.to_string(),
    })
}
