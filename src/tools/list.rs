/// Tool for listing habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{compute_progress_percent, today, Habit, StatusCounts, StatusFilter};
use crate::storage::{HabitStore, KeyValueStore};
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Filter: 'all', 'active', 'completed' or 'archived' (default: all)
    pub filter: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub status_label: String,
    pub target: Option<u32>,
    pub completed_days: usize,
    pub progress_percent: u8,
    pub completed_today: bool,
}

impl HabitSummary {
    fn from_habit(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.to_string(),
            title: habit.title.clone(),
            description: habit.description.clone(),
            status: habit.status.as_str().to_string(),
            status_label: habit.status.display_name().to_string(),
            target: habit.target,
            completed_days: habit.completed_count(),
            progress_percent: compute_progress_percent(habit),
            completed_today: habit.is_completed_on(today()),
        }
    }
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub filter: StatusFilter,
    pub habits: Vec<HabitSummary>,
    /// Counts over the whole collection, not just the filtered habits
    pub counts: StatusCounts,
}

/// List habits from the provided store
pub fn list_habits<S: KeyValueStore>(
    store: &HabitStore<S>,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let filter = match params.filter.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };

    let habits = store.try_load_all()?;
    let counts = StatusCounts::from_habits(&habits);

    let summaries = filter
        .apply(&habits)
        .into_iter()
        .map(HabitSummary::from_habit)
        .collect();

    Ok(ListHabitsResponse {
        filter,
        habits: summaries,
        counts,
    })
}

impl ListHabitsResponse {
    /// Text rendering for MCP clients
    pub fn render(&self) -> String {
        if self.habits.is_empty() {
            return format!(
                "No habits found. {}",
                if self.counts.all == 0 {
                    "Create your first habit to get started!"
                } else {
                    self.filter.description()
                }
            );
        }

        let header = format!(
            "📋 **Habits** ({} shown) - {}\n\n",
            self.habits.len(),
            self.filter.description()
        );

        let list = self
            .habits
            .iter()
            .map(|h| {
                let progress = match h.target {
                    Some(target) => format!(
                        " | 📊 {} / {} days ({}%)",
                        h.completed_days, target, h.progress_percent
                    ),
                    None => format!(" | ✅ {} days", h.completed_days),
                };
                format!(
                    "🎯 **{}** [{}]{}{}\n   ID: {}",
                    h.title,
                    h.status_label,
                    progress,
                    if h.completed_today && h.status == "active" {
                        " | ✔ done today"
                    } else {
                        ""
                    },
                    h.habit_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let totals = format!(
            "\n\nAll: {} | Active: {} | Completed: {} | Archived: {}",
            self.counts.all, self.counts.active, self.counts.completed, self.counts.archived
        );

        format!("{}{}{}", header, list, totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewHabit;
    use crate::storage::{MemorySlots, StoreConfig};

    fn seeded() -> HabitStore<MemorySlots> {
        let store = HabitStore::new(MemorySlots::new(), StoreConfig::default());
        for title in ["Run", "Read", "Write"] {
            store.add(
                Habit::create(NewHabit {
                    title: title.to_string(),
                    ..Default::default()
                })
                .unwrap(),
            );
        }
        let habits = store.load_all();
        store.mark_completed(&habits[1].id);
        store.mark_archived(&habits[2].id);
        store
    }

    #[test]
    fn test_list_with_filter_keeps_full_counts() {
        let response = list_habits(
            &seeded(),
            ListHabitsParams {
                filter: Some("completed".to_string()),
            },
        )
        .unwrap();

        assert_eq!(response.habits.len(), 1);
        assert_eq!(response.habits[0].title, "Read");
        assert_eq!(response.habits[0].status_label, "Completed");
        assert_eq!(response.counts.all, 3);
        assert_eq!(response.counts.archived, 1);
        assert!(response.render().contains("Read"));
    }

    #[test]
    fn test_list_all_by_default() {
        let response = list_habits(&seeded(), ListHabitsParams::default()).unwrap();
        assert_eq!(response.habits.len(), 3);
        assert_eq!(response.habits[0].progress_percent, 0);
        assert_eq!(response.habits[0].target, Some(21));
    }

    #[test]
    fn test_invalid_filter() {
        let result = list_habits(
            &seeded(),
            ListHabitsParams {
                filter: Some("paused".to_string()),
            },
        );
        assert!(matches!(result, Err(ToolError::Domain(_))));
    }

    #[test]
    fn test_render_empty_store() {
        let store = HabitStore::new(MemorySlots::new(), StoreConfig::default());
        let response = list_habits(&store, ListHabitsParams::default()).unwrap();
        assert!(response.render().contains("Create your first habit"));
    }
}
