/// Recent-days strip shown under an expanded habit

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::Habit;

/// Days shown in the strip by default
pub const RECENT_WINDOW_DAYS: u32 = 7;

/// One cell of the strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub weekday: String,
    pub completed: bool,
    pub is_today: bool,
}

/// The `days` calendar days ending at `today`, oldest first
pub fn recent_days(habit: &Habit, today: NaiveDate, days: u32) -> Vec<CalendarDay> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset as i64);
            CalendarDay {
                date,
                weekday: date.format("%a").to_string(),
                completed: habit.is_completed_on(date),
                is_today: date == today,
            }
        })
        .collect()
}
