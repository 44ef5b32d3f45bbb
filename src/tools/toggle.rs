/// Tool for marking a habit done (or not done) on a day
///
/// This module implements the habit_toggle MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{
    compute_progress_percent, parse_date, today, toggle_completion_for_date, HabitStatus,
};
use crate::storage::{HabitStore, KeyValueStore, Mutation};
use crate::tools::{find_habit, parse_habit_id, ToolError};

/// Parameters for toggling a completion day
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ToggleParams {
    /// ID of the habit
    #[serde(default)]
    pub habit_id: String,
    /// Day to toggle (YYYY-MM-DD, optional - defaults to today)
    pub date: Option<String>,
}

/// Response from toggling a day
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    /// True if the day is now marked done
    pub marked: bool,
    /// The habit has reached its target and can be completed
    pub target_reached: bool,
    pub progress_percent: u8,
    pub message: String,
}

/// Toggle one day on a habit and save the result
///
/// Reaching the target does not complete the habit; the response asks the
/// user to confirm with habit_complete.
pub fn toggle_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: ToggleParams,
) -> Result<ToggleResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = match params.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };

    let habit = find_habit(store, &habit_id)?;
    let outcome = toggle_completion_for_date(&habit, date);

    match store.try_update(&outcome.habit)? {
        Mutation::Applied => {}
        Mutation::Rejected { from, to } => {
            return Err(ToolError::Rejected {
                habit_id: habit_id.to_string(),
                from,
                to,
            })
        }
        Mutation::NotFound | Mutation::Duplicate => {
            return Err(ToolError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
        }
    }

    let progress_percent = compute_progress_percent(&outcome.habit);
    let mut message = if outcome.marked {
        format!("✅ Marked '{}' done on {}", outcome.habit.title, date)
    } else {
        format!("↩️ Unmarked '{}' on {}", outcome.habit.title, date)
    };

    if let Some(progress) = outcome.habit.target_display() {
        message.push_str(&format!(" ({}, {}%)", progress, progress_percent));
    }

    if outcome.target_reached && outcome.habit.status == HabitStatus::Active {
        message.push_str(
            "\n🎉 You've reached your target days! Would you like to mark this habit as completed?",
        );
    }

    Ok(ToggleResponse {
        success: true,
        marked: outcome.marked,
        target_reached: outcome.target_reached,
        progress_percent,
        message,
    })
}
