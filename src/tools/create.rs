/// Tool for creating new habits
///
/// This module implements the habit_create and habit_templates MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{find_template, Habit, HabitTemplate, NewHabit, PREDEFINED_HABITS};
use crate::storage::{HabitStore, KeyValueStore, Mutation};
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    #[serde(default)]
    pub title: String,
    /// Optional details, e.g. "8 glasses per day"
    pub description: Option<String>,
    /// Number of days to complete (defaults to 21)
    pub target: Option<u32>,
    /// Start from a predefined habit; explicit fields override it
    pub template: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: Option<String>,
    pub message: String,
}

/// Create a new habit in the provided store
pub fn create_habit<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let mut input = match params.template.as_deref() {
        Some(name) => find_template(name)
            .map(HabitTemplate::to_new_habit)
            .ok_or_else(|| crate::domain::DomainError::Validation {
                message: format!(
                    "Unknown template '{}'. Available: {}",
                    name,
                    PREDEFINED_HABITS
                        .iter()
                        .map(|t| t.title)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?,
        None => NewHabit::default(),
    };

    if !params.title.trim().is_empty() {
        input.title = params.title;
    }
    if params.description.is_some() {
        input.description = params.description;
    }
    if params.target.is_some() {
        input.target = params.target;
    }

    let habit = Habit::create(input)?;
    let habit_id = habit.id.to_string();
    let title = habit.title.clone();
    let target = habit.target;

    match store.try_add(habit)? {
        Mutation::Applied => Ok(CreateHabitResponse {
            success: true,
            habit_id: Some(habit_id),
            message: format!(
                "✅ Created habit '{}'! Target: {} days",
                title,
                target.map(|t| t.to_string()).unwrap_or_else(|| "none".to_string())
            ),
        }),
        other => Ok(CreateHabitResponse {
            success: false,
            habit_id: None,
            message: format!("Habit '{}' was not saved ({:?})", title, other),
        }),
    }
}

/// Response listing the predefined habits
#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<HabitTemplate>,
    pub message: String,
}

pub fn list_templates() -> TemplatesResponse {
    let message = PREDEFINED_HABITS
        .iter()
        .map(|t| format!("• {} - {} ({} days)", t.title, t.description, t.target))
        .collect::<Vec<_>>()
        .join("\n");

    TemplatesResponse {
        templates: PREDEFINED_HABITS.to_vec(),
        message: format!("Popular habits to start with:\n{}", message),
    }
}
