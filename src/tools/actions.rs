/// Tools that change a habit's status or delete it
///
/// This module implements the habit_complete, habit_archive and
/// habit_delete MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::{HabitStore, KeyValueStore, Mutation};
use crate::tools::{parse_habit_id, ToolError};

/// Parameters naming a single habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HabitActionParams {
    /// ID of the habit
    #[serde(default)]
    pub habit_id: String,
}

/// Response from a status change or deletion
#[derive(Debug, Serialize)]
pub struct HabitActionResponse {
    pub success: bool,
    pub message: String,
}

/// Mark a habit as completed, typically after its target was reached
pub fn complete_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: HabitActionParams,
) -> Result<HabitActionResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let outcome = store.try_mark_completed(&habit_id)?;
    respond(&habit_id.to_string(), outcome, "🏆 Habit completed. Well done!")
}

/// Put a habit aside
pub fn archive_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: HabitActionParams,
) -> Result<HabitActionResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let outcome = store.try_mark_archived(&habit_id)?;
    respond(&habit_id.to_string(), outcome, "📦 Habit archived")
}

/// Delete a habit for good
pub fn delete_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: HabitActionParams,
) -> Result<HabitActionResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let outcome = store.try_remove(&habit_id)?;
    respond(&habit_id.to_string(), outcome, "🗑️ Habit deleted")
}

fn respond(
    habit_id: &str,
    outcome: Mutation,
    done: &str,
) -> Result<HabitActionResponse, ToolError> {
    match outcome {
        Mutation::Applied => Ok(HabitActionResponse {
            success: true,
            message: done.to_string(),
        }),
        Mutation::Rejected { from, to } => Err(ToolError::Rejected {
            habit_id: habit_id.to_string(),
            from,
            to,
        }),
        Mutation::NotFound | Mutation::Duplicate => Err(ToolError::HabitNotFound {
            habit_id: habit_id.to_string(),
        }),
    }
}
