/// Tool showing the recent days of one habit
///
/// This module implements the habit_week MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{parse_date, recent_days, today, CalendarDay, RECENT_WINDOW_DAYS};
use crate::storage::{HabitStore, KeyValueStore};
use crate::tools::{find_habit, parse_habit_id, ToolError};

const MAX_WINDOW_DAYS: u32 = 31;

/// Parameters for the recent-days view
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct WeekParams {
    /// ID of the habit
    #[serde(default)]
    pub habit_id: String,
    /// Number of days to show (default 7, max 31)
    pub days: Option<u32>,
    /// Last day shown (YYYY-MM-DD, optional - defaults to today)
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub days: Vec<CalendarDay>,
    pub message: String,
}

pub fn habit_week<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: WeekParams,
) -> Result<WeekResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let end = match params.end_date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let window = params
        .days
        .unwrap_or(RECENT_WINDOW_DAYS)
        .clamp(1, MAX_WINDOW_DAYS);

    let habit = find_habit(store, &habit_id)?;

    let days = recent_days(&habit, end, window);
    let strip = days
        .iter()
        .map(|d| {
            format!(
                "{}{} {}",
                if d.is_today { "*" } else { "" },
                d.weekday,
                if d.completed { "✅" } else { "⬜" }
            )
        })
        .collect::<Vec<_>>()
        .join("  ");

    Ok(WeekResponse {
        message: format!("📅 {}\n{}", habit.title, strip),
        days,
    })
}
